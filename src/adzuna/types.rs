// src/adzuna/types.rs
//! Upstream response shapes for the Adzuna jobs API.

use crate::types::job::{UpstreamFlag, UpstreamId};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SearchBody {
    #[serde(default)]
    pub results: Vec<RawAdzunaJob>,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub mean: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DisplayName {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryField {
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawAdzunaJob {
    #[serde(default)]
    pub id: Option<UpstreamId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<DisplayName>,
    #[serde(default)]
    pub location: Option<DisplayName>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub contract_type: Option<String>,
    #[serde(default)]
    pub contract_time: Option<String>,
    #[serde(default)]
    pub salary_min: Option<f64>,
    #[serde(default)]
    pub salary_max: Option<f64>,
    // Arrives as "1"/"0" strings on the live API.
    #[serde(default)]
    pub salary_is_predicted: Option<UpstreamFlag>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryField>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}
