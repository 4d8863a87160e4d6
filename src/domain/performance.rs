//! Bulk insert/select run types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How many records a run should touch
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PerformanceRequest {
    #[schema(example = 1000)]
    pub quantity: u32,
}

/// Outcome of a run
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PerformanceReport {
    /// `INSERT` or `SELECT`
    #[schema(example = "INSERT")]
    pub operation: String,
    /// Records actually inserted or read
    #[schema(example = 1000)]
    pub quantity: u32,
    #[schema(example = 5321)]
    pub elapsed_milliseconds: u64,
    pub message: String,
}
