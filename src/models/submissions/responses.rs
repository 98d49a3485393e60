use serde::Serialize;

// 单个作业的提交统计
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionStatistics {
    pub total_submissions: u64,
    pub graded_submissions: u64,
    pub pending_submissions: u64,
    pub late_submissions: u64,
    pub on_time_submissions: u64,
    /// "x.x%"
    pub submission_rate: String,
    /// "0.00"
    pub average_marks: String,
    pub highest_marks: f64,
    pub lowest_marks: f64,
    pub total_marks: f64,
    pub total_enrolled: u64,
}

impl SubmissionStatistics {
    /// 无人选课时为 "0.0%"，上限 100%
    pub fn rate(submitted: u64, enrolled: u64) -> String {
        if enrolled == 0 {
            return "0.0%".to_string();
        }
        let rate = (submitted as f64 / enrolled as f64 * 100.0).min(100.0);
        format!("{rate:.1}%")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_rate() {
        assert_eq!(SubmissionStatistics::rate(0, 0), "0.0%");
        assert_eq!(SubmissionStatistics::rate(3, 0), "0.0%");
        assert_eq!(SubmissionStatistics::rate(1, 3), "33.3%");
        assert_eq!(SubmissionStatistics::rate(5, 4), "100.0%");
    }
}
