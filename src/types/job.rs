// src/types/job.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel for textual fields the upstream API left out.
pub const NOT_AVAILABLE: &str = "N/A";

/// One job listing, normalized to the same shape regardless of which API it
/// came from. Source-specific fields live in [`SourceDetails`] and are
/// flattened into the serialized object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRecord {
    pub job_id: String,
    pub title: String,
    pub company: String,
    pub url: String,
    pub posted_date: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(flatten)]
    pub details: SourceDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SourceDetails {
    Board(BoardDetails),
    Global(GlobalDetails),
}

/// Extra fields only the Singapore job board provides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardDetails {
    pub categories: Vec<String>,
    pub employment_type: Vec<String>,
    pub location: Vec<String>,
    pub experience: String,
    pub education: String,
    pub position_level: String,
    pub work_arrangement: String,
    pub skills: Vec<serde_json::Value>,
    pub expires_date: String,
}

/// Extra fields only the global job API provides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalDetails {
    pub location: String,
    pub category: String,
    pub contract_type: String,
    pub contract_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<f64>,
    pub salary_is_predicted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

// ----- upstream decode helpers -----
// Both APIs are loose about scalar types: ids arrive as numbers or strings,
// flags as booleans, numbers or "1"/"0" strings.

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum UpstreamId {
    Num(u64),
    Text(String),
}

impl fmt::Display for UpstreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum UpstreamFlag {
    Bool(bool),
    Num(i64),
    Text(String),
}

impl UpstreamFlag {
    pub fn truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Num(n) => *n != 0,
            Self::Text(s) => !s.is_empty() && s != "0",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_id_decodes_numbers_and_strings() {
        let num: UpstreamId = serde_json::from_str("42817").unwrap();
        let text: UpstreamId = serde_json::from_str("\"42817\"").unwrap();
        assert_eq!(num.to_string(), "42817");
        assert_eq!(text.to_string(), "42817");
    }

    #[test]
    fn test_upstream_flag_truthiness() {
        let cases = [
            ("true", true),
            ("false", false),
            ("1", true),
            ("0", false),
            ("\"1\"", true),
            ("\"0\"", false),
            ("\"\"", false),
        ];
        for (json, expected) in cases {
            let flag: UpstreamFlag = serde_json::from_str(json).unwrap();
            assert_eq!(flag.truthy(), expected, "flag {json}");
        }
    }
}
