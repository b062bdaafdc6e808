//! Matchmaking candidate models.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::profile::Gender;

/// A profile the caller may send a request to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PotentialMatch {
    pub id: Uuid,
    pub name: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub photo_url: Option<String>,
    pub religious_info: Value,
    pub preferences: Value,
    pub has_existing_request: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PotentialMatchesResponse {
    pub matches: Vec<PotentialMatch>,
    pub total: usize,
}
