// src/agent/tools.rs
//! The registry of operations exposed to the model. Parameter schemas are
//! derived from the argument structs, and dispatch converts every outcome
//! (including malformed arguments) into a `success`/`error` envelope.

use super::chat::{FunctionSpec, ToolSpec};
use crate::adzuna::{AdzunaClient, AdzunaSearchRequest};
use crate::jobboard::statistics::{job_market_statistics, DEFAULT_SAMPLE_SIZE};
use crate::jobboard::JobBoardClient;
use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SEARCH_FINDSGJOBS: &str = "search_findsgjobs";
pub const GET_FINDSGJOBS_STATISTICS: &str = "get_findsgjobs_statistics";
pub const SEARCH_ADZUNA: &str = "search_adzuna";
pub const GET_SALARY_HISTOGRAM: &str = "get_salary_histogram";
pub const GET_TOP_HIRING_COMPANIES: &str = "get_top_hiring_companies";

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchJobBoardArgs {
    /// Search keywords, e.g. "cook" or "data analyst".
    pub keywords: String,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page_count: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct JobStatisticsArgs {
    pub keywords: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchAdzunaArgs {
    /// Job title or keywords.
    pub what: String,
    /// Location name, e.g. "Singapore" or "United Kingdom".
    #[serde(default, rename = "where")]
    pub location: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub results_per_page: Option<u32>,
    /// One of "relevance", "date" or "salary".
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SalaryHistogramArgs {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TopCompaniesArgs {
    #[serde(default)]
    pub location: Option<String>,
}

fn function_spec<T: JsonSchema>(name: &'static str, description: &'static str) -> ToolSpec {
    let parameters = serde_json::to_value(schema_for!(T))
        .unwrap_or_else(|_| serde_json::json!({"type": "object"}));
    ToolSpec {
        spec_type: "function",
        function: FunctionSpec {
            name,
            description,
            parameters,
        },
    }
}

pub fn catalogue() -> Vec<ToolSpec> {
    vec![
        function_spec::<SearchJobBoardArgs>(
            SEARCH_FINDSGJOBS,
            "Search jobs on FindSGJobs (Singapore-specific, detailed local information)",
        ),
        function_spec::<JobStatisticsArgs>(
            GET_FINDSGJOBS_STATISTICS,
            "Get job market statistics and trends from FindSGJobs",
        ),
        function_spec::<SearchAdzunaArgs>(
            SEARCH_ADZUNA,
            "Search jobs on Adzuna (global database with salary insights)",
        ),
        function_spec::<SalaryHistogramArgs>(
            GET_SALARY_HISTOGRAM,
            "Get salary distribution data from Adzuna",
        ),
        function_spec::<TopCompaniesArgs>(
            GET_TOP_HIRING_COMPANIES,
            "Get the list of top hiring companies from Adzuna",
        ),
    ]
}

/// Execute one model-requested tool call. Always returns an envelope value;
/// malformed arguments and unknown names become failures, not faults.
pub async fn dispatch(
    board: &JobBoardClient,
    adzuna: &AdzunaClient,
    name: &str,
    arguments: &str,
) -> Value {
    match name {
        SEARCH_FINDSGJOBS => match parse_args::<SearchJobBoardArgs>(arguments) {
            Ok(args) => {
                let response = board
                    .search(
                        &args.keywords,
                        args.page.unwrap_or(1),
                        args.per_page_count.unwrap_or(10),
                    )
                    .await;
                envelope(response)
            }
            Err(message) => failure(message),
        },
        GET_FINDSGJOBS_STATISTICS => match parse_args::<JobStatisticsArgs>(arguments) {
            Ok(args) => {
                let response =
                    job_market_statistics(board, &args.keywords, DEFAULT_SAMPLE_SIZE).await;
                envelope(response)
            }
            Err(message) => failure(message),
        },
        SEARCH_ADZUNA => match parse_args::<SearchAdzunaArgs>(arguments) {
            Ok(args) => {
                let mut request = AdzunaSearchRequest::new(args.what);
                if let Some(location) = args.location {
                    request.location = location;
                }
                if let Some(page) = args.page {
                    request.page = page;
                }
                if let Some(results_per_page) = args.results_per_page {
                    request.results_per_page = results_per_page;
                }
                if let Some(sort_by) = args.sort_by {
                    request.sort_by = sort_by;
                }
                request.category = args.category;

                envelope(adzuna.search(&request).await)
            }
            Err(message) => failure(message),
        },
        GET_SALARY_HISTOGRAM => match parse_args::<SalaryHistogramArgs>(arguments) {
            Ok(args) => {
                let location = args.location.as_deref().unwrap_or("Singapore");
                envelope(adzuna.histogram(location, args.category.as_deref()).await)
            }
            Err(message) => failure(message),
        },
        GET_TOP_HIRING_COMPANIES => match parse_args::<TopCompaniesArgs>(arguments) {
            Ok(args) => {
                let location = args.location.as_deref().unwrap_or("Singapore");
                envelope(adzuna.top_companies(location).await)
            }
            Err(message) => failure(message),
        },
        _ => failure(format!("Unknown tool: {name}")),
    }
}

fn parse_args<T: DeserializeOwned>(arguments: &str) -> Result<T, String> {
    serde_json::from_str(arguments).map_err(|e| format!("Invalid tool arguments: {e}"))
}

fn envelope<T: Serialize>(response: T) -> Value {
    serde_json::to_value(response)
        .unwrap_or_else(|e| failure(format!("Failed to serialize tool result: {e}")))
}

fn failure(message: String) -> Value {
    serde_json::json!({"success": false, "error": message})
}
