// src/jobboard/mod.rs
use crate::html_text::strip_html;
use crate::types::{BoardDetails, JobRecord, SourceDetails, NOT_AVAILABLE};
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{error, info};

pub mod statistics;
pub mod types;

use types::{Caption, RawJob, SearchableEntry, SearchableResponse};

pub const DEFAULT_BASE_URL: &str = "https://www.findsgjobs.com";
/// Public job-detail pages live on the same host as the API.
const JOB_LINK_BASE: &str = "https://www.findsgjobs.com/job";
const SEARCH_ENDPOINT: &str = "/apis/job/searchable";
const REQUEST_TIMEOUT_SECS: u64 = 10;
/// The searchable endpoint rejects larger pages.
pub const MAX_PER_PAGE: u32 = 20;

/// Search outcome for the Singapore job board. Failures carry a message
/// instead of propagating an error to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct JobSearchResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub total_jobs: u64,
    pub current_page: u32,
    pub total_pages: u32,
    pub results_on_page: usize,
    pub jobs: Vec<JobRecord>,
}

impl JobSearchResponse {
    fn found(total_jobs: u64, current_page: u32, total_pages: u32, jobs: Vec<JobRecord>) -> Self {
        Self {
            success: true,
            error: None,
            total_jobs,
            current_page,
            total_pages,
            results_on_page: jobs.len(),
            jobs,
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            success: false,
            error: Some(message),
            total_jobs: 0,
            current_page: 0,
            total_pages: 0,
            results_on_page: 0,
            jobs: Vec::new(),
        }
    }
}

pub struct JobBoardClient {
    client: reqwest::Client,
    base_url: String,
}

impl JobBoardClient {
    pub fn new(base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    /// Run one keyword search. `per_page` is clamped to [`MAX_PER_PAGE`] and
    /// `page` floored at 1 before the request goes out.
    pub async fn search(&self, keywords: &str, page: u32, per_page: u32) -> JobSearchResponse {
        match self.perform_search(keywords, page, per_page).await {
            Ok(response) => response,
            Err(e) => {
                error!("Job board search failed: {e:#}");
                JobSearchResponse::failure(format!("API request failed: {e:#}"))
            }
        }
    }

    async fn perform_search(
        &self,
        keywords: &str,
        page: u32,
        per_page: u32,
    ) -> Result<JobSearchResponse> {
        let url = format!("{}{}", self.base_url, SEARCH_ENDPOINT);
        let params = query_params(keywords, page, per_page);

        info!("Searching job board: keywords={keywords:?} page={page}");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .context("Failed to reach the job board API")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("job board API returned {status}");
        }

        let body: SearchableResponse = response
            .json()
            .await
            .context("Failed to decode the job board response")?;

        Ok(build_search_response(body, page.max(1)))
    }
}

fn query_params(keywords: &str, page: u32, per_page: u32) -> [(&'static str, String); 3] {
    [
        ("page", page.max(1).to_string()),
        ("per_page_count", per_page.min(MAX_PER_PAGE).to_string()),
        ("keywords", keywords.to_string()),
    ]
}

fn build_search_response(body: SearchableResponse, requested_page: u32) -> JobSearchResponse {
    let Some(data) = body.data else {
        return JobSearchResponse::found(0, requested_page, 0, Vec::new());
    };

    let pager = data.pager.unwrap_or_default();
    let jobs: Vec<JobRecord> = data
        .result
        .unwrap_or_default()
        .into_iter()
        .map(map_entry)
        .collect();

    JobSearchResponse::found(
        pager.record_count,
        pager.page.unwrap_or(requested_page),
        pager.page_count,
        jobs,
    )
}

fn map_entry(entry: SearchableEntry) -> JobRecord {
    let job = entry.job.unwrap_or_default();
    let company = entry.company.unwrap_or_default();

    let job_id = job.id.as_ref().map(ToString::to_string).unwrap_or_default();
    let url = if job_id.is_empty() {
        String::new()
    } else {
        format!("{JOB_LINK_BASE}/{job_id}")
    };

    let description = job
        .description
        .as_deref()
        .map(strip_html)
        .unwrap_or_default();

    JobRecord {
        job_id,
        title: text_or_na(job.title.as_deref()),
        company: text_or_na(company.company_name.as_deref()),
        url,
        posted_date: text_or_na(job.activation_date.as_deref()),
        description,
        salary: format_salary(&job),
        details: SourceDetails::Board(BoardDetails {
            categories: captions(&job.categories),
            employment_type: captions(&job.employment_types),
            location: captions(&job.nearest_mrt_stations),
            experience: caption_or_na(&job.experience),
            education: caption_or_na(&job.education),
            position_level: caption_or_na(&job.position_level),
            work_arrangement: caption_or_na(&job.work_arrangement),
            skills: job.skills.clone().unwrap_or_default(),
            expires_date: text_or_na(job.expiration_date.as_deref()),
        }),
    }
}

/// `"{currency} {range} per {interval}"`, but only when the listing allows
/// salary display. A truthy do-not-display flag suppresses the salary even
/// when every sub-field is populated.
fn format_salary(job: &RawJob) -> Option<String> {
    let suppressed = job
        .do_not_display_salary
        .as_ref()
        .is_some_and(|flag| flag.truthy());
    if suppressed {
        return None;
    }

    let range = job.salary_range.as_ref()?.caption.as_deref()?;
    let currency = caption_or(&job.currency, "SGD");
    let interval = caption_or(&job.interval, "Month");
    Some(format!("{currency} {range} per {interval}"))
}

fn caption_or(field: &Option<Caption>, default: &str) -> String {
    field
        .as_ref()
        .and_then(|c| c.caption.clone())
        .unwrap_or_else(|| default.to_string())
}

fn caption_or_na(field: &Option<Caption>) -> String {
    caption_or(field, NOT_AVAILABLE)
}

fn text_or_na(value: Option<&str>) -> String {
    match value {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn captions(list: &Option<Vec<Caption>>) -> Vec<String> {
    list.as_deref()
        .unwrap_or_default()
        .iter()
        .map(|c| c.caption.clone().unwrap_or_default())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "data": {
            "pager": {"record_count": 134, "page": 1, "page_count": 14},
            "result": [
                {
                    "job": {
                        "id": 42817,
                        "Title": "Commis Cook",
                        "JobDescription": "<p>Prep work</p><p>Plating</p>",
                        "id_Job_Donotdisplaysalary": 0,
                        "Salaryrange": {"caption": "2,200 - 2,800"},
                        "id_Job_Currency": {"caption": "SGD"},
                        "id_Job_Interval": {"caption": "Month"},
                        "JobCategory": [{"caption": "F&B"}, {"caption": "Hospitality"}],
                        "EmploymentType": [{"caption": "Full Time"}],
                        "id_Job_NearestMRTStation": [{"caption": "Orchard"}],
                        "MinimumYearsofExperience": {"caption": "2 years"},
                        "MinimumEducationLevel": {"caption": "Secondary"},
                        "id_Job_PositionLevel": {"caption": "Junior"},
                        "id_Job_WorkArrangement": {"caption": "On-site"},
                        "id_Job_Skills": ["knife skills"],
                        "activation_date": "2025-11-01",
                        "expiration_date": "2025-12-01"
                    },
                    "company": {"CompanyName": "Good Food Pte Ltd"}
                },
                {
                    "job": {
                        "id": "42818",
                        "Title": "Sous Chef",
                        "id_Job_Donotdisplaysalary": 1,
                        "Salaryrange": {"caption": "4,000 - 5,000"},
                        "id_Job_Currency": {"caption": "SGD"}
                    },
                    "company": {}
                }
            ]
        }
    }"#;

    fn search_fixture() -> JobSearchResponse {
        let body: SearchableResponse = serde_json::from_str(FIXTURE).unwrap();
        build_search_response(body, 1)
    }

    #[test]
    fn test_per_page_is_clamped_before_the_request() {
        let params = query_params("chef", 1, 25);
        assert_eq!(params[1], ("per_page_count", "20".to_string()));
    }

    #[test]
    fn test_page_is_floored_at_one() {
        let params = query_params("chef", 0, 10);
        assert_eq!(params[0], ("page", "1".to_string()));
    }

    #[test]
    fn test_pagination_and_invariant() {
        let response = search_fixture();
        assert!(response.success);
        assert_eq!(response.total_jobs, 134);
        assert_eq!(response.current_page, 1);
        assert_eq!(response.total_pages, 14);
        assert_eq!(response.results_on_page, response.jobs.len());
    }

    #[test]
    fn test_maps_full_entry() {
        let response = search_fixture();
        let job = &response.jobs[0];

        assert_eq!(job.job_id, "42817");
        assert_eq!(job.title, "Commis Cook");
        assert_eq!(job.company, "Good Food Pte Ltd");
        assert_eq!(job.url, "https://www.findsgjobs.com/job/42817");
        assert_eq!(job.posted_date, "2025-11-01");
        assert_eq!(job.description, "Prep workPlating");
        assert_eq!(job.salary.as_deref(), Some("SGD 2,200 - 2,800 per Month"));

        let SourceDetails::Board(details) = &job.details else {
            panic!("expected board details");
        };
        assert_eq!(details.categories, vec!["F&B", "Hospitality"]);
        assert_eq!(details.employment_type, vec!["Full Time"]);
        assert_eq!(details.location, vec!["Orchard"]);
        assert_eq!(details.experience, "2 years");
        assert_eq!(details.expires_date, "2025-12-01");
    }

    #[test]
    fn test_do_not_display_flag_suppresses_salary() {
        let response = search_fixture();
        let job = &response.jobs[1];
        assert_eq!(job.salary, None);
    }

    #[test]
    fn test_missing_fields_become_sentinels() {
        let response = search_fixture();
        let job = &response.jobs[1];

        assert_eq!(job.company, NOT_AVAILABLE);
        assert_eq!(job.posted_date, NOT_AVAILABLE);
        assert_eq!(job.description, "");
        let SourceDetails::Board(details) = &job.details else {
            panic!("expected board details");
        };
        assert_eq!(details.education, NOT_AVAILABLE);
        assert!(details.categories.is_empty());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let first = serde_json::to_string(&search_fixture()).unwrap();
        let second = serde_json::to_string(&search_fixture()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_body_is_a_success_with_no_jobs() {
        let body: SearchableResponse = serde_json::from_str("{}").unwrap();
        let response = build_search_response(body, 3);
        assert!(response.success);
        assert_eq!(response.current_page, 3);
        assert!(response.jobs.is_empty());
    }

    #[tokio::test]
    async fn test_clamped_per_page_reaches_the_wire() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let served = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{FIXTURE}",
                FIXTURE.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            request
        });

        let client = JobBoardClient::new(format!("http://{addr}")).unwrap();
        let response = client.search("chef", 1, 25).await;
        assert!(response.success);
        assert_eq!(response.jobs.len(), 2);

        let request = served.await.unwrap();
        assert!(request.contains("per_page_count=20"));
        assert!(request.contains("keywords=chef"));
    }

    #[tokio::test]
    async fn test_upstream_error_becomes_a_failure_envelope() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

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

        let client = JobBoardClient::new(format!("http://{addr}")).unwrap();
        let response = client.search("cook", 1, 10).await;
        assert!(!response.success);
        assert!(response.error.as_deref().is_some_and(|e| e.contains("500")));
        assert!(response.jobs.is_empty());
    }
}
