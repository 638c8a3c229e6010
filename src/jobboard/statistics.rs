// src/jobboard/statistics.rs
use super::{JobBoardClient, MAX_PER_PAGE};
use crate::types::{JobRecord, SourceDetails, NOT_AVAILABLE};
use serde::Serialize;
use tracing::info;

pub const DEFAULT_SAMPLE_SIZE: u32 = 20;
const TOP_FACET_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct JobStatisticsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub keyword: String,
    pub total_jobs_in_market: u64,
    pub jobs_analyzed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<FacetSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetCount {
    pub label: String,
    pub count: u32,
}

/// Per-facet occurrence counts. Ranked facets are `{label, count}` lists so
/// the descending order survives JSON serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetSummary {
    pub top_categories: Vec<FacetCount>,
    pub employment_types: Vec<FacetCount>,
    pub top_locations: Vec<FacetCount>,
    pub education_requirements: Vec<FacetCount>,
    pub experience_requirements: Vec<FacetCount>,
}

/// Search a bounded sample and tabulate facet frequencies. A failed search
/// propagates its error message verbatim.
pub async fn job_market_statistics(
    client: &JobBoardClient,
    keywords: &str,
    sample_size: u32,
) -> JobStatisticsResponse {
    let search = client
        .search(keywords, 1, sample_size.min(MAX_PER_PAGE))
        .await;

    if !search.success {
        return JobStatisticsResponse {
            success: false,
            error: search.error,
            keyword: keywords.to_string(),
            total_jobs_in_market: 0,
            jobs_analyzed: 0,
            statistics: None,
        };
    }

    info!(
        "Tabulating statistics for {keywords:?} over {} jobs",
        search.jobs.len()
    );

    JobStatisticsResponse {
        success: true,
        error: None,
        keyword: keywords.to_string(),
        total_jobs_in_market: search.total_jobs,
        jobs_analyzed: search.jobs.len(),
        statistics: Some(tabulate(&search.jobs)),
    }
}

/// Counts labels in first-seen order so ties rank deterministically.
#[derive(Default)]
struct FacetCounter(Vec<FacetCount>);

impl FacetCounter {
    fn bump(&mut self, label: &str) {
        if label.is_empty() {
            return;
        }
        match self.0.iter_mut().find(|f| f.label == label) {
            Some(entry) => entry.count += 1,
            None => self.0.push(FacetCount {
                label: label.to_string(),
                count: 1,
            }),
        }
    }

    fn into_all(self) -> Vec<FacetCount> {
        self.0
    }

    /// Descending by count; the sort is stable, so tied labels keep their
    /// first-seen order.
    fn into_top(mut self, limit: usize) -> Vec<FacetCount> {
        self.0.sort_by(|a, b| b.count.cmp(&a.count));
        self.0.truncate(limit);
        self.0
    }
}

fn tabulate(jobs: &[JobRecord]) -> FacetSummary {
    let mut categories = FacetCounter::default();
    let mut employment_types = FacetCounter::default();
    let mut locations = FacetCounter::default();
    let mut education = FacetCounter::default();
    let mut experience = FacetCounter::default();

    for job in jobs {
        let SourceDetails::Board(details) = &job.details else {
            continue;
        };

        for category in &details.categories {
            categories.bump(category);
        }
        for employment_type in &details.employment_type {
            employment_types.bump(employment_type);
        }
        for location in &details.location {
            locations.bump(location);
        }
        if details.education != NOT_AVAILABLE {
            education.bump(&details.education);
        }
        if details.experience != NOT_AVAILABLE {
            experience.bump(&details.experience);
        }
    }

    FacetSummary {
        top_categories: categories.into_top(TOP_FACET_LIMIT),
        employment_types: employment_types.into_all(),
        top_locations: locations.into_top(TOP_FACET_LIMIT),
        education_requirements: education.into_all(),
        experience_requirements: experience.into_all(),
    }
}
