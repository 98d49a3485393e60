//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

use chrono::{DateTime, Utc};

pub mod prelude;

pub mod academic_years;
pub mod assignments;
pub mod attendances;
pub mod certificates;
pub mod colleges;
pub mod course_enrollments;
pub mod courses;
pub mod departments;
pub mod divisions;
pub mod exam_results;
pub mod exam_subject_results;
pub mod exams;
pub mod faculties;
pub mod internships;
pub mod semesters;
pub mod students;
pub mod subjects;
pub mod submissions;
pub mod users;

/// 秒级时间戳转 UTC 时间
pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
