// Integration tests for Rally Insight

use actix_web::{http::StatusCode, test as actix_test, web, App};
use rally_insight::core::{MatchAnalyzer, RecommendationEngine, RecommendationThresholds};
use rally_insight::models::{DetailLevel, RallyBucket, ServeMarker};
use rally_insight::routes::{analysis::AppState, configure_routes};
use rally_insight::services::{LoaderError, MatchLogLoader};
use serde_json::{json, Value};

const MATCH_LOG: &str = "\
Player_1,Serve,Serve Zone,Serve Result,Shot Type,Finish Type,Game Score
Nadia,-,-,-,Warm-up,-,-
Nadia,1st Serve,T,Ace,Serve,-,0-0
Nadia,1st Serve,Wide,In,Serve,-,15-0
Lena,-,-,-,Backhand,-,-
Nadia,-,-,-,Forehand,-,-
Lena,-,-,-,Backhand,-,-
Nadia,-,-,-,Forehand,Winner,-
Nadia,1st Serve,T,-,Serve,-,30-0
Nadia,2nd Serve,Body,In,Serve,-,30-0
Lena,-,-,-,Slice,-,-
Nadia,-,-,-,Forehand,-,-
Lena,-,-,-,Backhand,-,-
Nadia,-,-,-,Forehand,-,-
Lena,-,-,-,Backhand,-,-
Nadia,-,-,-,Forehand,-,-
Lena,-,-,-,Backhand,Unforced Error,-
Nadia,1st Serve,T,In,Serve,-,40-0
Lena,-,-,-,Forehand,Winner,-
Lena,1st Serve,Wide,In,Serve,-,0-0
Nadia,-,-,-,Backhand,-,-
Lena,-,-,-,Forehand,-,-
Nadia,-,-,-,Forehand,Forced Error,-
Lena,1st Serve,T,-,Serve,-,15-0
Lena,2nd Serve,Body,Double Fault,Serve,-,15-0
Lena,1st Serve,T,In,Serve,-,15-40
Nadia,-,-,-,Forehand,Winner,-
";

fn app_state(detail: DetailLevel) -> AppState {
    AppState {
        analyzer: MatchAnalyzer::default(),
        default_detail: detail,
    }
}

#[test]
fn test_integration_end_to_end_csv_analysis() {
    let events = MatchLogLoader::from_csv_str(MATCH_LOG).unwrap();
    assert_eq!(events.len(), 26);
    assert_eq!(events[1].serve, Some(ServeMarker::First));

    let report = MatchAnalyzer::default()
        .analyze(&events, DetailLevel::Detailed)
        .unwrap();

    // The warm-up row precedes the first serve and belongs to no point
    assert_eq!(report.points_analyzed, 9);
    assert_eq!(report.players[0].name, "Nadia");
    assert_eq!(report.players[1].name, "Lena");

    let nadia = &report.player("Nadia").unwrap().stats;
    assert_eq!(nadia.first_serve.attempted, 4);
    assert_eq!(nadia.first_serve.in_play, 3);
    assert_eq!(nadia.aces, 1);
    assert_eq!(nadia.second_serve.attempted, 1);
    assert_eq!(nadia.second_serve.won, 1);
    assert_eq!(nadia.shot_types.get("Warm-up"), None);
    assert_eq!(nadia.rally(RallyBucket::Long).won, 1);
    assert_eq!(nadia.break_points.faced, 1);
    assert_eq!(nadia.break_points.converted, 1);

    let lena = &report.player("Lena").unwrap().stats;
    assert_eq!(lena.double_faults, 1);
    assert_eq!(lena.first_serve.attempted, 3);
    assert_eq!(lena.first_serve.won, 1);
    assert_eq!(lena.break_points.saved, 0);
    assert_eq!(lena.rally(RallyBucket::Long).total, 1);
    assert_eq!(lena.rally(RallyBucket::Long).won, 0);
}

#[test]
fn test_integration_custom_thresholds() {
    let events = MatchLogLoader::from_csv_str(MATCH_LOG).unwrap();

    let thresholds = RecommendationThresholds {
        serve_zone_concentration_pct: 101.0,
        ..RecommendationThresholds::default()
    };
    let analyzer = MatchAnalyzer::new(Default::default(), RecommendationEngine::new(thresholds));

    let report = analyzer.analyze(&events, DetailLevel::Detailed).unwrap();
    for player in &report.players {
        assert!(player
            .recommendations
            .improvements
            .iter()
            .all(|entry| !entry.contains("zone")));
    }
}

#[test]
fn test_integration_loader_rejects_missing_serve_column() {
    let err = MatchLogLoader::from_csv_str("Player_1,Shot Type\nNadia,Serve\n").unwrap_err();
    assert!(matches!(err, LoaderError::MissingColumns(_)));
}

#[actix_web::test]
async fn test_health_endpoint() {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(DetailLevel::Medium)))
            .configure(configure_routes),
    )
    .await;

    let req = actix_test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_csv_upload_returns_both_players() {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(DetailLevel::Medium)))
            .configure(configure_routes),
    )
    .await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/analysis/csv?detailLevel=minimal")
        .insert_header(("content-type", "text/csv"))
        .set_payload(MATCH_LOG)
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["detailLevel"], "minimal");
    assert_eq!(body["pointsAnalyzed"], 9);
    assert_eq!(body["players"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["players"][0]["name"], "Nadia");
    assert_eq!(body["players"][0]["stats"]["aces"], 1);

    for player in body["players"].as_array().unwrap() {
        for entries in player["recommendations"].as_object().unwrap().values() {
            assert!(entries.as_array().unwrap().len() <= 1);
        }
    }
}

#[actix_web::test]
async fn test_json_analysis_uses_default_detail_level() {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(DetailLevel::Detailed)))
            .configure(configure_routes),
    )
    .await;

    let payload = json!({
        "events": [
            { "player": "Nadia", "serve": "1st Serve", "serveResult": "In", "shotType": "Serve", "gameScore": "30-40" },
            { "player": "Lena", "shotType": "Forehand", "finishType": "Winner" }
        ]
    });
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/analysis")
        .set_json(&payload)
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["detailLevel"], "detailed");
    assert_eq!(body["players"][1]["stats"]["break_points"]["converted"], 1);
    assert!(body["analysisId"].as_str().is_some());
}

#[actix_web::test]
async fn test_single_player_log_is_unprocessable() {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(DetailLevel::Medium)))
            .configure(configure_routes),
    )
    .await;

    let payload = json!({
        "events": [
            { "player": "Nadia", "serve": "1st Serve", "serveResult": "Ace", "shotType": "Serve" }
        ],
        "detailLevel": "medium"
    });
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/analysis")
        .set_json(&payload)
        .to_request();
    let resp = actix_test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["status_code"], 422);
}

#[actix_web::test]
async fn test_empty_event_list_fails_validation() {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(DetailLevel::Medium)))
            .configure(configure_routes),
    )
    .await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/analysis")
        .set_json(json!({ "events": [] }))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_csv_without_serve_column_is_bad_request() {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(DetailLevel::Medium)))
            .configure(configure_routes),
    )
    .await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/analysis/csv")
        .set_payload("Player_1,Shot Type\nNadia,Serve\nLena,Forehand\n")
        .to_request();
    let resp = actix_test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("Serve"));
}
