use serde::Serialize;

use super::entities::ExamResult;

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResultStatistics {
    pub total_results: u64,
    pub pass_count: u64,
    pub fail_count: u64,
    pub pass_percentage: f64,
    pub fail_percentage: f64,
    pub average_spi: f64,
    pub average_cpi: f64,
    pub highest_spi: f64,
    pub lowest_spi: f64,
    pub top_spi_result: Option<ExamResult>,
    pub top_cpi_result: Option<ExamResult>,
}
