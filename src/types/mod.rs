pub mod job;

pub use job::{BoardDetails, GlobalDetails, JobRecord, SourceDetails, NOT_AVAILABLE};
