use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{MatchAnalyzer, RosterError};
use crate::models::{AnalyzeMatchRequest, AnalyzeMatchResponse, DetailLevel, DetailQuery, ErrorResponse, HealthResponse, ShotEvent};
use crate::services::MatchLogLoader;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub analyzer: MatchAnalyzer,
    pub default_detail: DetailLevel,
}

/// Configure all analysis routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/analysis", web::post().to(analyze_match))
        .route("/analysis/csv", web::post().to(analyze_csv));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Analyse a match log sent as JSON
///
/// POST /api/v1/analysis
///
/// Request body:
/// ```json
/// {
///   "events": [
///     { "player": "Alice", "serve": "1st Serve", "serveResult": "In", "shotType": "Serve" }
///   ],
///   "detailLevel": "medium"
/// }
/// ```
async fn analyze_match(
    state: web::Data<AppState>,
    req: web::Json<AnalyzeMatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for analysis request: {}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let detail = req.detail_level.unwrap_or(state.default_detail);
    run_analysis(&state, &req.events, detail)
}

/// Analyse a match log uploaded as CSV
///
/// POST /api/v1/analysis/csv?detailLevel=minimal|medium|detailed
///
/// The body is the raw CSV export with at least the `Player_1`, `Serve`
/// and `Shot Type` columns.
async fn analyze_csv(
    state: web::Data<AppState>,
    query: web::Query<DetailQuery>,
    body: web::Bytes,
) -> impl Responder {
    let events = match MatchLogLoader::from_reader(body.as_ref()) {
        Ok(events) => events,
        Err(e) => {
            tracing::info!("Rejected match log upload: {}", e);
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid match log".to_string(),
                message: e.to_string(),
                status_code: 400,
            });
        }
    };

    let detail = query.detail_level.unwrap_or(state.default_detail);
    run_analysis(&state, &events, detail)
}

fn run_analysis(state: &AppState, events: &[ShotEvent], detail: DetailLevel) -> HttpResponse {
    match state.analyzer.analyze(events, detail) {
        Ok(report) => HttpResponse::Ok().json(AnalyzeMatchResponse {
            analysis_id: uuid::Uuid::new_v4().to_string(),
            detail_level: detail,
            report,
            analyzed_at: chrono::Utc::now(),
        }),
        Err(e @ RosterError::InsufficientRoster { .. }) => {
            tracing::info!("Cannot analyse match: {}", e);
            HttpResponse::UnprocessableEntity().json(ErrorResponse {
                error: "Insufficient roster".to_string(),
                message: e.to_string(),
                status_code: 422,
            })
        }
    }
}
