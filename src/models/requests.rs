use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::models::domain::{DetailLevel, ShotEvent};

/// Request to analyse a match log sent as JSON
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnalyzeMatchRequest {
    #[validate(length(min = 1), custom(function = "validate_players"))]
    pub events: Vec<ShotEvent>,
    #[serde(default)]
    #[serde(alias = "detail_level", rename = "detailLevel")]
    pub detail_level: Option<DetailLevel>,
}

/// Query parameters for the CSV upload endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetailQuery {
    #[serde(default)]
    #[serde(alias = "detail_level", rename = "detailLevel")]
    pub detail_level: Option<DetailLevel>,
}

fn validate_players(events: &[ShotEvent]) -> Result<(), ValidationError> {
    if events.iter().any(|e| e.validate().is_err()) {
        return Err(ValidationError::new("blank_player"));
    }
    Ok(())
}
