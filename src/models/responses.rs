use serde::{Deserialize, Serialize};
use crate::core::MatchReport;
use crate::models::domain::DetailLevel;

/// Response for the analysis endpoints
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeMatchResponse {
    #[serde(rename = "analysisId")]
    pub analysis_id: String,
    #[serde(rename = "detailLevel")]
    pub detail_level: DetailLevel,
    #[serde(flatten)]
    pub report: MatchReport,
    #[serde(rename = "analyzedAt")]
    pub analyzed_at: chrono::DateTime<chrono::Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
