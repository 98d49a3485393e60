//! 考勤
//!
//! 按 (课程, 日期) 整批替换；学生端只提供按课程的出勤汇总。

use std::sync::Arc;

use tracing::info;

use crate::errors::{Result, TrackademyError};
use crate::models::attendance::{
    entities::Attendance,
    requests::{AttendanceQuery, BulkAttendanceRequest, UpdateAttendanceRequest},
    responses::{AttendanceEntry, AttendanceSummary},
};
use crate::models::courses::{entities::Course, responses::CourseOverview};
use crate::models::students::entities::Student;
use crate::models::users::entities::Identity;
use crate::services::courses::COURSE_NOT_FOUND;
use crate::services::profiles::{faculty_profile, student_profile};
use crate::storage::Storage;

pub const ATTENDANCE_NOT_FOUND: &str = "Attendance record not found.";
const NOT_COURSE_FACULTY: &str = "You are not authorized to manage attendance for this course.";

/// 学生端的返回
#[derive(Debug)]
pub enum AttendanceView {
    Records(Vec<AttendanceEntry>),
    Summary(Vec<AttendanceSummary>),
}

pub struct AttendanceService {
    storage: Arc<dyn Storage>,
}

impl AttendanceService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    // 教师只能操作自己任教的课程，管理员不受限
    async fn managed_course(&self, identity: &Identity, course_id: i64) -> Result<Course> {
        let storage = self.storage.as_ref();
        let course = storage
            .get_course(course_id, false)
            .await?
            .ok_or_else(|| TrackademyError::not_found(COURSE_NOT_FOUND))?;
        if identity.is_faculty() {
            let faculty = faculty_profile(storage, identity).await?;
            if course.faculty_id != faculty.id {
                return Err(TrackademyError::forbidden(NOT_COURSE_FACULTY));
            }
        }
        Ok(course)
    }

    pub async fn view_attendance(
        &self,
        identity: Identity,
        query: AttendanceQuery,
    ) -> Result<AttendanceView> {
        let storage = self.storage.as_ref();
        if identity.is_student() {
            let student = student_profile(storage, &identity).await?;
            let summary = storage
                .attendance_summary(student.id, query.semester_id)
                .await?;
            return Ok(AttendanceView::Summary(summary));
        }

        let (Some(course_id), Some(date)) = (query.course_id, query.lecture_date()?) else {
            return Err(TrackademyError::bad_request(
                "Course ID and Date are required for this role.",
            ));
        };
        self.managed_course(&identity, course_id).await?;
        let records = storage.list_attendance(course_id, date).await?;
        Ok(AttendanceView::Records(records))
    }

    pub async fn take_attendance(
        &self,
        identity: Identity,
        req: BulkAttendanceRequest,
    ) -> Result<Vec<Attendance>> {
        let storage = self.storage.as_ref();
        let date = req.lecture_date()?;
        self.managed_course(&identity, req.course_id).await?;

        for record in &req.records {
            if !storage
                .is_student_enrolled(record.student_id, req.course_id)
                .await?
            {
                return Err(TrackademyError::bad_request(format!(
                    "Student {} is not enrolled in this course.",
                    record.student_id
                )));
            }
        }

        let saved = storage
            .replace_attendance(req.course_id, date, req.records)
            .await?;
        info!(
            "Attendance for course {} on {} recorded ({} students) by user {}",
            req.course_id,
            date,
            saved.len(),
            identity.user_id
        );
        Ok(saved)
    }

    pub async fn update_attendance(
        &self,
        identity: Identity,
        id: i64,
        req: UpdateAttendanceRequest,
    ) -> Result<Attendance> {
        let storage = self.storage.as_ref();
        let current = storage
            .get_attendance(id)
            .await?
            .ok_or_else(|| TrackademyError::not_found(ATTENDANCE_NOT_FOUND))?;
        self.managed_course(&identity, current.course_id).await?;

        storage
            .update_attendance_status(id, req.status)
            .await?
            .ok_or_else(|| TrackademyError::not_found(ATTENDANCE_NOT_FOUND))
    }

    pub async fn faculty_courses(&self, identity: Identity) -> Result<Vec<CourseOverview>> {
        let storage = self.storage.as_ref();
        let faculty = faculty_profile(storage, &identity).await?;
        storage.list_faculty_course_overviews(faculty.id).await
    }

    pub async fn course_students(&self, identity: Identity, course_id: i64) -> Result<Vec<Student>> {
        self.managed_course(&identity, course_id).await?;
        self.storage.list_course_students(course_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::requests::AttendanceRecordInput;
    use crate::models::{AttendanceStatus, UserRole};
    use crate::testing::{Fixture, course, faculty, identity, student, subject};

    struct Class {
        fx: Fixture,
        course_id: i64,
        faculty_user: i64,
        students: Vec<Student>,
    }

    async fn class() -> Class {
        let fx = Fixture::new().await;
        let s = subject(&fx, "3140705").await;
        let f = faculty(&fx, "priya@college.edu", "Priya Nair").await;
        let c = course(&fx, s.id, f.id).await;
        let a = student(&fx, "CE501", "Arjun Iyer").await;
        let b = student(&fx, "CE502", "Bela Roy").await;
        fx.storage.enroll_students(c.id, vec![a.id, b.id]).await.unwrap();
        Class {
            course_id: c.id,
            faculty_user: f.user_id,
            students: vec![a, b],
            fx,
        }
    }

    fn bulk(course_id: i64, records: Vec<(i64, AttendanceStatus)>) -> BulkAttendanceRequest {
        BulkAttendanceRequest {
            course_id,
            date: "2025-01-15".into(),
            records: records
                .into_iter()
                .map(|(student_id, status)| AttendanceRecordInput { student_id, status })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_second_bulk_replaces_first() {
        let class = class().await;
        let service = AttendanceService::new(class.fx.shared());
        let instructor = identity(class.faculty_user, UserRole::Faculty);
        let (a, b) = (class.students[0].id, class.students[1].id);

        service
            .take_attendance(
                instructor,
                bulk(
                    class.course_id,
                    vec![(a, AttendanceStatus::Present), (b, AttendanceStatus::Absent)],
                ),
            )
            .await
            .unwrap();
        service
            .take_attendance(
                instructor,
                bulk(class.course_id, vec![(b, AttendanceStatus::MedicalLeave)]),
            )
            .await
            .unwrap();

        let view = service
            .view_attendance(
                instructor,
                AttendanceQuery {
                    course_id: Some(class.course_id),
                    date: Some("2025-01-15".into()),
                    semester_id: None,
                },
            )
            .await
            .unwrap();
        let AttendanceView::Records(records) = view else {
            panic!("faculty should receive records");
        };
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].attendance.student_id, b);
        assert_eq!(records[0].attendance.status, AttendanceStatus::MedicalLeave);
    }

    #[tokio::test]
    async fn test_unpadded_date_replaces_same_lecture() {
        let class = class().await;
        let service = AttendanceService::new(class.fx.shared());
        let instructor = identity(class.faculty_user, UserRole::Faculty);
        let (a, b) = (class.students[0].id, class.students[1].id);

        service
            .take_attendance(
                instructor,
                bulk(
                    class.course_id,
                    vec![(a, AttendanceStatus::Present), (b, AttendanceStatus::Present)],
                ),
            )
            .await
            .unwrap();
        let mut again = bulk(class.course_id, vec![(a, AttendanceStatus::Absent)]);
        again.date = "2025-1-15".into();
        service.take_attendance(instructor, again).await.unwrap();

        let view = service
            .view_attendance(
                instructor,
                AttendanceQuery {
                    course_id: Some(class.course_id),
                    date: Some("2025-1-15".into()),
                    semester_id: None,
                },
            )
            .await
            .unwrap();
        let AttendanceView::Records(records) = view else {
            panic!("faculty should receive records");
        };
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].attendance.date, "2025-01-15");
        assert_eq!(records[0].attendance.status, AttendanceStatus::Absent);

        let view = service
            .view_attendance(
                identity(class.students[0].user_id, UserRole::Student),
                AttendanceQuery::default(),
            )
            .await
            .unwrap();
        let AttendanceView::Summary(summary) = view else {
            panic!("students should receive a summary");
        };
        assert_eq!(summary[0].total_lectures, 1);
        assert_eq!(summary[0].absent_count, 1);
        assert_eq!(summary[0].present_count, 0);
    }

    #[tokio::test]
    async fn test_role_rules() {
        let class = class().await;
        let service = AttendanceService::new(class.fx.shared());
        let outsider = faculty(&class.fx, "other@college.edu", "Other").await;

        let err = service
            .view_attendance(identity(1, UserRole::Admin), AttendanceQuery::default())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Course ID and Date are required for this role.");

        let err = service
            .take_attendance(
                identity(outsider.user_id, UserRole::Faculty),
                bulk(class.course_id, vec![(class.students[0].id, AttendanceStatus::Present)]),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E003");

        let stranger = student(&class.fx, "CE599", "Not Enrolled").await;
        let err = service
            .take_attendance(
                identity(class.faculty_user, UserRole::Faculty),
                bulk(class.course_id, vec![(stranger.id, AttendanceStatus::Present)]),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");
    }

    #[tokio::test]
    async fn test_student_summary_and_status_update() {
        let class = class().await;
        let service = AttendanceService::new(class.fx.shared());
        let instructor = identity(class.faculty_user, UserRole::Faculty);
        let a = &class.students[0];

        let saved = service
            .take_attendance(
                instructor,
                bulk(class.course_id, vec![(a.id, AttendanceStatus::Absent)]),
            )
            .await
            .unwrap();
        let updated = service
            .update_attendance(
                instructor,
                saved[0].id,
                UpdateAttendanceRequest {
                    status: AttendanceStatus::Present,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, AttendanceStatus::Present);

        let view = service
            .view_attendance(identity(a.user_id, UserRole::Student), AttendanceQuery::default())
            .await
            .unwrap();
        let AttendanceView::Summary(summary) = view else {
            panic!("students should receive a summary");
        };
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].present_count, 1);
        assert_eq!(summary[0].percentage, 100.0);

        let overviews = service.faculty_courses(instructor).await.unwrap();
        assert_eq!(overviews.len(), 1);
        assert_eq!(service.course_students(instructor, class.course_id).await.unwrap().len(), 2);
    }
}
