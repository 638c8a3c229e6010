// src/jobboard/types.rs
//! Upstream response shapes for the FindSGJobs searchable endpoint.
//! Field names and nesting are a compatibility contract with the live
//! service and must stay exactly as consumed here.

use crate::types::job::{UpstreamFlag, UpstreamId};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SearchableResponse {
    #[serde(default)]
    pub data: Option<SearchableData>,
}

#[derive(Debug, Deserialize)]
pub struct SearchableData {
    #[serde(default)]
    pub pager: Option<Pager>,
    #[serde(default)]
    pub result: Option<Vec<SearchableEntry>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Pager {
    #[serde(default)]
    pub record_count: u64,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_count: u32,
}

#[derive(Debug, Deserialize)]
pub struct SearchableEntry {
    #[serde(default)]
    pub job: Option<RawJob>,
    #[serde(default)]
    pub company: Option<RawCompany>,
}

/// A `{caption}` wrapper, used by the board for most enumerated fields.
#[derive(Debug, Default, Deserialize)]
pub struct Caption {
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawJob {
    #[serde(default)]
    pub id: Option<UpstreamId>,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "JobDescription", default)]
    pub description: Option<String>,
    #[serde(rename = "id_Job_Donotdisplaysalary", default)]
    pub do_not_display_salary: Option<UpstreamFlag>,
    #[serde(rename = "Salaryrange", default)]
    pub salary_range: Option<Caption>,
    #[serde(rename = "id_Job_Currency", default)]
    pub currency: Option<Caption>,
    #[serde(rename = "id_Job_Interval", default)]
    pub interval: Option<Caption>,
    #[serde(rename = "JobCategory", default)]
    pub categories: Option<Vec<Caption>>,
    #[serde(rename = "EmploymentType", default)]
    pub employment_types: Option<Vec<Caption>>,
    #[serde(rename = "id_Job_NearestMRTStation", default)]
    pub nearest_mrt_stations: Option<Vec<Caption>>,
    #[serde(rename = "MinimumYearsofExperience", default)]
    pub experience: Option<Caption>,
    #[serde(rename = "MinimumEducationLevel", default)]
    pub education: Option<Caption>,
    #[serde(rename = "id_Job_PositionLevel", default)]
    pub position_level: Option<Caption>,
    #[serde(rename = "id_Job_WorkArrangement", default)]
    pub work_arrangement: Option<Caption>,
    #[serde(rename = "id_Job_Skills", default)]
    pub skills: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub activation_date: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawCompany {
    #[serde(rename = "CompanyName", default)]
    pub company_name: Option<String>,
}
