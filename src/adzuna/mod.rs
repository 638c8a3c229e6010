// src/adzuna/mod.rs
use crate::html_text::{truncate_chars, MAX_DESCRIPTION_CHARS};
use crate::types::{GlobalDetails, JobRecord, SourceDetails, NOT_AVAILABLE};
use anyhow::{Context, Result};
use serde::Serialize;
use std::env;
use tracing::{error, info};

pub mod types;

use types::{RawAdzunaJob, SearchBody};

pub const DEFAULT_BASE_URL: &str = "https://api.adzuna.com";
const REQUEST_TIMEOUT_SECS: u64 = 15;
pub const MAX_RESULTS_PER_PAGE: u32 = 50;
/// Histogram and leaderboard data is only published for the Singapore index.
const ANALYTICS_COUNTRY: &str = "sg";

const APP_ID_VAR: &str = "ADZUNA_APP_ID";
const APP_KEY_VAR: &str = "ADZUNA_APP_KEY";
const MISSING_CREDENTIALS: &str = "ADZUNA_APP_ID and ADZUNA_APP_KEY environment variables must be \
     set. Get your credentials from https://developer.adzuna.com/";

/// Map a location name to an Adzuna country index. Unrecognized names fall
/// back to Singapore.
pub fn country_code(location: &str) -> &'static str {
    match location.trim().to_lowercase().as_str() {
        "uk" | "united kingdom" | "gb" => "gb",
        "us" | "usa" | "united states" => "us",
        "au" | "australia" => "au",
        _ => "sg",
    }
}

#[derive(Debug, Clone)]
pub struct AdzunaCredentials {
    pub app_id: String,
    pub app_key: String,
}

impl AdzunaCredentials {
    /// Both values must be present and non-empty; the error message names the
    /// requirement so it can be surfaced to the user unchanged.
    pub fn from_values(app_id: Option<String>, app_key: Option<String>) -> Result<Self> {
        let app_id = app_id.filter(|v| !v.is_empty());
        let app_key = app_key.filter(|v| !v.is_empty());
        match (app_id, app_key) {
            (Some(app_id), Some(app_key)) => Ok(Self { app_id, app_key }),
            _ => anyhow::bail!(MISSING_CREDENTIALS),
        }
    }

    /// Re-read on every call so credentials fixed mid-process take effect.
    pub fn from_env() -> Result<Self> {
        Self::from_values(env::var(APP_ID_VAR).ok(), env::var(APP_KEY_VAR).ok())
    }
}

#[derive(Debug, Clone)]
pub struct AdzunaSearchRequest {
    pub what: String,
    pub location: String,
    pub page: u32,
    pub results_per_page: u32,
    pub sort_by: String,
    pub category: Option<String>,
}

impl AdzunaSearchRequest {
    pub fn new(what: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            location: "Singapore".to_string(),
            page: 1,
            results_per_page: 5,
            sort_by: "relevance".to_string(),
            category: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdzunaSearchResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub total_results: u64,
    pub current_page: u32,
    pub results_on_page: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_salary: Option<f64>,
    pub jobs: Vec<JobRecord>,
}

impl AdzunaSearchResponse {
    fn found(total_results: u64, current_page: u32, mean_salary: Option<f64>, jobs: Vec<JobRecord>) -> Self {
        Self {
            success: true,
            error: None,
            total_results,
            current_page,
            results_on_page: jobs.len(),
            mean_salary,
            jobs,
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            success: false,
            error: Some(message),
            total_results: 0,
            current_page: 0,
            results_on_page: 0,
            mean_salary: None,
            jobs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SalaryHistogramResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Upstream bucket mapping, passed through verbatim.
    pub histogram: serde_json::Value,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopCompaniesResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Upstream leaderboard list, passed through verbatim.
    pub top_companies: serde_json::Value,
    pub location: String,
}

pub struct AdzunaClient {
    client: reqwest::Client,
    base_url: String,
}

impl AdzunaClient {
    pub fn new(base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub async fn search(&self, request: &AdzunaSearchRequest) -> AdzunaSearchResponse {
        let credentials = match AdzunaCredentials::from_env() {
            Ok(credentials) => credentials,
            Err(e) => return AdzunaSearchResponse::failure(e.to_string()),
        };

        match self.perform_search(&credentials, request).await {
            Ok(response) => response,
            Err(e) => {
                error!("Adzuna search failed: {e:#}");
                AdzunaSearchResponse::failure(format!("API request failed: {e:#}"))
            }
        }
    }

    async fn perform_search(
        &self,
        credentials: &AdzunaCredentials,
        request: &AdzunaSearchRequest,
    ) -> Result<AdzunaSearchResponse> {
        let country = country_code(&request.location);
        let url = format!("{}{}", self.base_url, search_path(country, request.page));
        let params = search_params(credentials, request, country);

        info!(
            "Searching Adzuna: what={:?} country={country} page={}",
            request.what, request.page
        );

        let body: SearchBody = self.get_json(&url, &params).await?;

        let jobs: Vec<JobRecord> = body.results.into_iter().map(map_job).collect();
        Ok(AdzunaSearchResponse::found(
            body.count,
            request.page,
            body.mean,
            jobs,
        ))
    }

    pub async fn histogram(&self, location: &str, category: Option<&str>) -> SalaryHistogramResponse {
        let credentials = match AdzunaCredentials::from_env() {
            Ok(credentials) => credentials,
            Err(e) => {
                return SalaryHistogramResponse {
                    success: false,
                    error: Some(e.to_string()),
                    histogram: serde_json::Value::Null,
                    location: location.to_string(),
                    category: category.map(str::to_string),
                }
            }
        };

        match self
            .perform_histogram(&credentials, location, category)
            .await
        {
            Ok(histogram) => SalaryHistogramResponse {
                success: true,
                error: None,
                histogram,
                location: location.to_string(),
                category: category.map(str::to_string),
            },
            Err(e) => {
                error!("Adzuna histogram failed: {e:#}");
                SalaryHistogramResponse {
                    success: false,
                    error: Some(format!("API request failed: {e:#}")),
                    histogram: serde_json::Value::Null,
                    location: location.to_string(),
                    category: category.map(str::to_string),
                }
            }
        }
    }

    async fn perform_histogram(
        &self,
        credentials: &AdzunaCredentials,
        location: &str,
        category: Option<&str>,
    ) -> Result<serde_json::Value> {
        let url = format!(
            "{}/v1/api/jobs/{ANALYTICS_COUNTRY}/histogram",
            self.base_url
        );
        let mut params = credential_params(credentials);
        params.push(("location0", location.to_string()));
        if let Some(category) = category {
            params.push(("category", category.to_string()));
        }

        info!("Fetching Adzuna salary histogram for {location:?}");

        let body: serde_json::Value = self.get_json(&url, &params).await?;
        Ok(body
            .get("histogram")
            .cloned()
            .unwrap_or_else(|| serde_json::json!({})))
    }

    pub async fn top_companies(&self, location: &str) -> TopCompaniesResponse {
        let credentials = match AdzunaCredentials::from_env() {
            Ok(credentials) => credentials,
            Err(e) => {
                return TopCompaniesResponse {
                    success: false,
                    error: Some(e.to_string()),
                    top_companies: serde_json::Value::Null,
                    location: location.to_string(),
                }
            }
        };

        match self.perform_top_companies(&credentials, location).await {
            Ok(leaderboard) => TopCompaniesResponse {
                success: true,
                error: None,
                top_companies: leaderboard,
                location: location.to_string(),
            },
            Err(e) => {
                error!("Adzuna top companies failed: {e:#}");
                TopCompaniesResponse {
                    success: false,
                    error: Some(format!("API request failed: {e:#}")),
                    top_companies: serde_json::Value::Null,
                    location: location.to_string(),
                }
            }
        }
    }

    async fn perform_top_companies(
        &self,
        credentials: &AdzunaCredentials,
        location: &str,
    ) -> Result<serde_json::Value> {
        let url = format!(
            "{}/v1/api/jobs/{ANALYTICS_COUNTRY}/top_companies",
            self.base_url
        );
        let mut params = credential_params(credentials);
        params.push(("location0", location.to_string()));

        info!("Fetching Adzuna top companies for {location:?}");

        let body: serde_json::Value = self.get_json(&url, &params).await?;
        Ok(body
            .get("leaderboard")
            .cloned()
            .unwrap_or_else(|| serde_json::json!([])))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&'static str, String)],
    ) -> Result<T> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .context("Failed to reach the Adzuna API")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Adzuna API returned {status}");
        }

        response
            .json()
            .await
            .context("Failed to decode the Adzuna response")
    }
}

fn search_path(country: &str, page: u32) -> String {
    format!("/v1/api/jobs/{country}/search/{page}")
}

fn credential_params(credentials: &AdzunaCredentials) -> Vec<(&'static str, String)> {
    vec![
        ("app_id", credentials.app_id.clone()),
        ("app_key", credentials.app_key.clone()),
    ]
}

fn search_params(
    credentials: &AdzunaCredentials,
    request: &AdzunaSearchRequest,
    country: &str,
) -> Vec<(&'static str, String)> {
    // The upstream API only honours the area filter on the sg index; other
    // indexes get an empty `where`.
    let area = if country == "sg" {
        request.location.clone()
    } else {
        String::new()
    };

    let mut params = credential_params(credentials);
    params.push((
        "results_per_page",
        request.results_per_page.min(MAX_RESULTS_PER_PAGE).to_string(),
    ));
    params.push(("what", request.what.clone()));
    params.push(("where", area));
    params.push(("sort_by", request.sort_by.clone()));
    if let Some(category) = &request.category {
        params.push(("category", category.clone()));
    }
    params
}

fn map_job(raw: RawAdzunaJob) -> JobRecord {
    let description = raw
        .description
        .as_deref()
        .map(|text| truncate_chars(text, MAX_DESCRIPTION_CHARS))
        .unwrap_or_default();

    JobRecord {
        job_id: raw.id.as_ref().map(ToString::to_string).unwrap_or_default(),
        title: text_or_na(raw.title),
        company: text_or_na(raw.company.unwrap_or_default().display_name),
        url: raw.redirect_url.unwrap_or_default(),
        posted_date: text_or_na(raw.created),
        description,
        salary: None,
        details: SourceDetails::Global(GlobalDetails {
            location: text_or_na(raw.location.unwrap_or_default().display_name),
            category: text_or_na(raw.category.unwrap_or_default().label),
            contract_type: text_or_na(raw.contract_type),
            contract_time: text_or_na(raw.contract_time),
            salary_min: raw.salary_min,
            salary_max: raw.salary_max,
            salary_is_predicted: raw
                .salary_is_predicted
                .as_ref()
                .is_some_and(|flag| flag.truthy()),
            latitude: raw.latitude,
            longitude: raw.longitude,
        }),
    }
}

fn text_or_na(value: Option<String>) -> String {
    match value {
        Some(s) if !s.is_empty() => s,
        _ => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> AdzunaCredentials {
        AdzunaCredentials {
            app_id: "id".to_string(),
            app_key: "key".to_string(),
        }
    }

    #[test]
    fn test_country_code_mapping() {
        assert_eq!(country_code("United Kingdom"), "gb");
        assert_eq!(country_code("uk"), "gb");
        assert_eq!(country_code("USA"), "us");
        assert_eq!(country_code("australia"), "au");
        assert_eq!(country_code("Singapore"), "sg");
        assert_eq!(country_code("Jurong East"), "sg");
    }

    #[test]
    fn test_search_path_is_country_scoped() {
        assert_eq!(search_path("gb", 1), "/v1/api/jobs/gb/search/1");
        assert_eq!(search_path("sg", 3), "/v1/api/jobs/sg/search/3");
    }

    #[test]
    fn test_missing_credentials_name_the_requirement() {
        let err = AdzunaCredentials::from_values(None, Some("key".to_string())).unwrap_err();
        assert!(err.to_string().contains("ADZUNA_APP_ID"));
        assert!(err.to_string().contains("ADZUNA_APP_KEY"));

        let err = AdzunaCredentials::from_values(Some(String::new()), Some("key".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("must be set"));
    }

    #[test]
    fn test_results_per_page_is_clamped() {
        let mut request = AdzunaSearchRequest::new("data analyst");
        request.results_per_page = 120;
        let params = search_params(&credentials(), &request, "sg");
        let (_, value) = params
            .iter()
            .find(|(name, _)| *name == "results_per_page")
            .unwrap();
        assert_eq!(value, "50");
    }

    #[test]
    fn test_where_is_emptied_outside_the_sg_index() {
        let mut request = AdzunaSearchRequest::new("data analyst");
        request.location = "United Kingdom".to_string();
        let params = search_params(&credentials(), &request, country_code(&request.location));
        let (_, area) = params.iter().find(|(name, _)| *name == "where").unwrap();
        assert_eq!(area, "");

        request.location = "Jurong East".to_string();
        let params = search_params(&credentials(), &request, country_code(&request.location));
        let (_, area) = params.iter().find(|(name, _)| *name == "where").unwrap();
        assert_eq!(area, "Jurong East");
    }

    #[test]
    fn test_category_is_only_sent_when_present() {
        let request = AdzunaSearchRequest::new("chef");
        let params = search_params(&credentials(), &request, "sg");
        assert!(params.iter().all(|(name, _)| *name != "category"));

        let mut request = AdzunaSearchRequest::new("chef");
        request.category = Some("it-jobs".to_string());
        let params = search_params(&credentials(), &request, "sg");
        assert!(params.iter().any(|(name, _)| *name == "category"));
    }

    #[test]
    fn test_map_job_truncates_and_passes_salary_through() {
        let raw: RawAdzunaJob = serde_json::from_value(serde_json::json!({
            "id": 99,
            "title": "Data Analyst",
            "company": {"display_name": "Acme"},
            "location": {"display_name": "Singapore"},
            "description": "d".repeat(700),
            "created": "2025-11-02T00:00:00Z",
            "salary_min": 4000.0,
            "salary_max": 6000.0,
            "salary_is_predicted": "1",
            "redirect_url": "https://www.adzuna.sg/details/99",
            "category": {"label": "IT Jobs"},
            "latitude": 1.29,
            "longitude": 103.85
        }))
        .unwrap();

        let job = map_job(raw);
        assert_eq!(job.description.chars().count(), MAX_DESCRIPTION_CHARS + 3);
        assert!(job.description.ends_with("..."));
        assert_eq!(job.salary, None);

        let SourceDetails::Global(details) = &job.details else {
            panic!("expected global details");
        };
        assert_eq!(details.salary_min, Some(4000.0));
        assert_eq!(details.salary_max, Some(6000.0));
        assert!(details.salary_is_predicted);
        assert_eq!(details.latitude, Some(1.29));
        assert_eq!(details.location, "Singapore");
    }

    #[tokio::test]
    async fn test_upstream_error_becomes_a_failure_envelope() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        std::env::set_var("ADZUNA_APP_ID", "id");
        std::env::set_var("ADZUNA_APP_KEY", "key");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\n\r\n")
                .await;
        });

        let client = AdzunaClient::new(format!("http://{addr}")).unwrap();
        let response = client.search(&AdzunaSearchRequest::new("cook")).await;
        assert!(!response.success);
        assert!(response.error.as_deref().is_some_and(|e| e.contains("500")));
    }

    #[test]
    fn test_map_job_defaults_missing_fields() {
        let job = map_job(RawAdzunaJob::default());
        assert_eq!(job.title, NOT_AVAILABLE);
        assert_eq!(job.company, NOT_AVAILABLE);
        assert_eq!(job.url, "");
        assert_eq!(job.description, "");

        let SourceDetails::Global(details) = &job.details else {
            panic!("expected global details");
        };
        assert_eq!(details.contract_type, NOT_AVAILABLE);
        assert_eq!(details.salary_min, None);
        assert!(!details.salary_is_predicted);
    }
}
