//! 考勤存储操作

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::{SeaOrmStorage, now_ts};
use crate::entity::attendances::{ActiveModel, Column, Entity as Attendances};
use crate::entity::{course_enrollments, courses, faculties, students, subjects};
use crate::errors::Result;
use crate::models::{
    AttendanceStatus,
    attendance::{
        entities::Attendance,
        requests::AttendanceRecordInput,
        responses::{AttendanceEntry, AttendanceSummary},
    },
};
use crate::storage::AttendanceStorage;
use crate::utils::validate::DATE_FORMAT;

// 日期统一存成补零的 YYYY-MM-DD，作为替换键
fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[async_trait]
impl AttendanceStorage for SeaOrmStorage {
    async fn replace_attendance(
        &self,
        course_id: i64,
        date: NaiveDate,
        records: Vec<AttendanceRecordInput>,
    ) -> Result<Vec<Attendance>> {
        let date = date_key(date);
        let txn = self.begin_write().await?;

        Attendances::delete_many()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::Date.eq(date.as_str()))
            .exec(&txn)
            .await?;

        let now = now_ts();
        let mut saved = Vec::with_capacity(records.len());
        for record in records {
            let model = ActiveModel {
                course_id: Set(course_id),
                student_id: Set(record.student_id),
                date: Set(date.clone()),
                status: Set(record.status.as_str().to_string()),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            saved.push(model.into_attendance());
        }

        txn.commit().await?;
        Ok(saved)
    }

    async fn list_attendance(
        &self,
        course_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceEntry>> {
        let rows = Attendances::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::Date.eq(date_key(date)))
            .find_also_related(students::Entity)
            .order_by_asc(students::Column::EnrollmentNumber)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(attendance, student)| {
                let (student_name, enrollment_number) = student
                    .map(|s| (s.full_name, s.enrollment_number))
                    .unwrap_or_default();
                AttendanceEntry {
                    attendance: attendance.into_attendance(),
                    student_name,
                    enrollment_number,
                }
            })
            .collect())
    }

    async fn get_attendance(&self, id: i64) -> Result<Option<Attendance>> {
        let model = Attendances::find_by_id(id).one(&self.db).await?;
        Ok(model.map(|m| m.into_attendance()))
    }

    async fn update_attendance_status(
        &self,
        id: i64,
        status: AttendanceStatus,
    ) -> Result<Option<Attendance>> {
        let Some(existing) = Attendances::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut model = ActiveModel::from(existing);
        model.status = Set(status.as_str().to_string());
        model.updated_at = Set(now_ts());
        Ok(Some(model.update(&self.db).await?.into_attendance()))
    }

    async fn attendance_summary(
        &self,
        student_id: i64,
        semester_id: Option<i64>,
    ) -> Result<Vec<AttendanceSummary>> {
        let course_ids: Vec<i64> = course_enrollments::Entity::find()
            .select_only()
            .column(course_enrollments::Column::CourseId)
            .filter(course_enrollments::Column::StudentId.eq(student_id))
            .into_tuple::<i64>()
            .all(&self.db)
            .await?;
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut select = courses::Entity::find()
            .filter(courses::Column::Id.is_in(course_ids))
            .filter(courses::Column::IsDeleted.eq(false));
        if let Some(semester_id) = semester_id {
            select = select.filter(courses::Column::SemesterId.eq(semester_id));
        }
        let courses = select.order_by_asc(courses::Column::Id).all(&self.db).await?;
        if courses.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = courses.iter().map(|c| c.id).collect();
        let subject_ids: Vec<i64> = courses.iter().map(|c| c.subject_id).collect();
        let faculty_ids: Vec<i64> = courses.iter().map(|c| c.faculty_id).collect();

        let subject_map: HashMap<i64, subjects::Model> = subjects::Entity::find()
            .filter(subjects::Column::Id.is_in(subject_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();
        let faculty_map: HashMap<i64, String> = faculties::Entity::find()
            .filter(faculties::Column::Id.is_in(faculty_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|f| (f.id, f.full_name))
            .collect();

        // (course_id, status) -> 次数
        let counts: HashMap<(i64, String), i64> = Attendances::find()
            .select_only()
            .column(Column::CourseId)
            .column(Column::Status)
            .column_as(Column::Id.count(), "count")
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CourseId.is_in(ids))
            .group_by(Column::CourseId)
            .group_by(Column::Status)
            .into_tuple::<(i64, String, i64)>()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(course_id, status, count)| ((course_id, status), count))
            .collect();
        let count_of = |course_id: i64, status: AttendanceStatus| -> u64 {
            counts
                .get(&(course_id, status.as_str().to_string()))
                .copied()
                .unwrap_or_default()
                .max(0) as u64
        };

        Ok(courses
            .into_iter()
            .map(|course| {
                let present_count = count_of(course.id, AttendanceStatus::Present);
                let absent_count = count_of(course.id, AttendanceStatus::Absent);
                let (subject_name, subject_code) = subject_map
                    .get(&course.subject_id)
                    .map(|s| (s.name.clone(), s.code.clone()))
                    .unwrap_or_default();
                let faculty_name = faculty_map
                    .get(&course.faculty_id)
                    .cloned()
                    .unwrap_or_default();
                let course = course.into_course();
                AttendanceSummary {
                    course_id: course.id,
                    subject_name,
                    subject_code,
                    faculty_name,
                    lecture_type: course.lecture_type,
                    batch: course.batch,
                    present_count,
                    absent_count,
                    total_lectures: present_count + absent_count,
                    percentage: AttendanceSummary::percentage_of(present_count, absent_count),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, Fixture};
    use crate::utils::validate::parse_date;

    fn day(value: &str) -> NaiveDate {
        parse_date(value).unwrap()
    }

    fn record(student_id: i64, status: AttendanceStatus) -> AttendanceRecordInput {
        AttendanceRecordInput { student_id, status }
    }

    #[tokio::test]
    async fn test_bulk_replaces_same_day() {
        let fx = Fixture::new().await;
        let subject = testing::subject(&fx, "3140702").await;
        let faculty = testing::faculty(&fx, "mehta@college.edu", "Prof. Mehta").await;
        let course = testing::course(&fx, subject.id, faculty.id).await;
        let aarav = testing::student(&fx, "22CE001", "Aarav Patel").await;
        let diya = testing::student(&fx, "22CE002", "Diya Mehta").await;

        fx.storage
            .replace_attendance(
                course.id,
                day("2024-09-02"),
                vec![
                    record(aarav.id, AttendanceStatus::Present),
                    record(diya.id, AttendanceStatus::Absent),
                ],
            )
            .await
            .unwrap();
        fx.storage
            .replace_attendance(
                course.id,
                day("2024-09-02"),
                vec![record(diya.id, AttendanceStatus::Present)],
            )
            .await
            .unwrap();

        let entries = fx
            .storage
            .list_attendance(course.id, day("2024-09-02"))
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].enrollment_number, "22CE002");
        assert_eq!(entries[0].attendance.status, AttendanceStatus::Present);
    }

    #[tokio::test]
    async fn test_summary_ignores_medical_leave() {
        let fx = Fixture::new().await;
        let subject = testing::subject(&fx, "3140702").await;
        let faculty = testing::faculty(&fx, "mehta@college.edu", "Prof. Mehta").await;
        let course = testing::course(&fx, subject.id, faculty.id).await;
        let aarav = testing::student(&fx, "22CE001", "Aarav Patel").await;
        fx.storage
            .enroll_students(course.id, vec![aarav.id])
            .await
            .unwrap();

        for (date, status) in [
            ("2024-09-02", AttendanceStatus::Present),
            ("2024-09-03", AttendanceStatus::Present),
            ("2024-09-04", AttendanceStatus::Absent),
            ("2024-09-05", AttendanceStatus::MedicalLeave),
        ] {
            fx.storage
                .replace_attendance(course.id, day(date), vec![record(aarav.id, status)])
                .await
                .unwrap();
        }

        let summary = fx
            .storage
            .attendance_summary(aarav.id, Some(fx.semester.id))
            .await
            .unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].present_count, 2);
        assert_eq!(summary[0].absent_count, 1);
        assert_eq!(summary[0].total_lectures, 3);
        assert_eq!(summary[0].percentage, 66.67);
        assert_eq!(summary[0].faculty_name, "Prof. Mehta");

        let other = fx
            .storage
            .attendance_summary(aarav.id, Some(fx.semester.id + 100))
            .await
            .unwrap();
        assert!(other.is_empty());
    }
}
