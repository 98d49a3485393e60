//! 作业提交存储操作

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::{SeaOrmStorage, now_ts};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::entity::{assignments, course_enrollments};
use crate::errors::Result;
use crate::models::{
    SubmissionStatus,
    assignments::entities::Assignment,
    submissions::{
        entities::Submission, requests::SubmissionFilter, responses::SubmissionStatistics,
    },
};
use crate::storage::{NewSubmission, SubmissionStorage};

#[async_trait]
impl SubmissionStorage for SeaOrmStorage {
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission> {
        let now = now_ts();
        let revived = Submissions::find()
            .filter(Column::AssignmentId.eq(submission.assignment_id))
            .filter(Column::StudentId.eq(submission.student_id))
            .filter(Column::IsDeleted.eq(true))
            .one(&self.db)
            .await?;

        let is_revival = revived.is_some();
        let mut model = match revived {
            Some(existing) => ActiveModel::from(existing),
            None => ActiveModel {
                created_at: Set(now),
                ..Default::default()
            },
        };
        model.assignment_id = Set(submission.assignment_id);
        model.student_id = Set(submission.student_id);
        model.content = Set(submission.content);
        model.file_path = Set(submission.file_path);
        model.status = Set(submission.status.as_str().to_string());
        model.marks_awarded = Set(None);
        model.feedback = Set(None);
        model.submitted_at = Set(now);
        model.graded_at = Set(None);
        model.is_deleted = Set(false);
        model.updated_at = Set(now);

        let saved = if is_revival {
            model.update(&self.db).await?
        } else {
            model.insert(&self.db).await?
        };
        Ok(saved.into_submission())
    }

    async fn get_submission(&self, id: i64) -> Result<Option<Submission>> {
        let model = self.find_live::<Submissions>(id, false).await?;
        Ok(model.map(|m| m.into_submission()))
    }

    async fn find_student_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let model = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.into_submission()))
    }

    async fn list_submissions(&self, filter: SubmissionFilter) -> Result<Vec<Submission>> {
        let mut condition = Condition::all().add(Column::IsDeleted.eq(false));
        if let Some(assignment_id) = filter.assignment_id {
            condition = condition.add(Column::AssignmentId.eq(assignment_id));
        }
        if let Some(status) = filter.status {
            condition = condition.add(Column::Status.eq(status.as_str()));
        }
        if let Some(student_id) = filter.student_id {
            condition = condition.add(Column::StudentId.eq(student_id));
        }
        if let Some(course_ids) = filter.course_ids {
            let assignment_ids: Vec<i64> = assignments::Entity::find()
                .select_only()
                .column(assignments::Column::Id)
                .filter(assignments::Column::CourseId.is_in(course_ids))
                .into_tuple::<i64>()
                .all(&self.db)
                .await?;
            condition = condition.add(Column::AssignmentId.is_in(assignment_ids));
        }

        let models = Submissions::find()
            .filter(condition)
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into_submission()).collect())
    }

    async fn update_submission_content(
        &self,
        id: i64,
        content: Option<String>,
        file_path: Option<String>,
    ) -> Result<Option<Submission>> {
        let Some(existing) = self.find_live::<Submissions>(id, false).await? else {
            return Ok(None);
        };

        let mut model = ActiveModel::from(existing);
        if let Some(content) = content {
            model.content = Set(Some(content));
        }
        if let Some(file_path) = file_path {
            model.file_path = Set(Some(file_path));
        }
        let now = now_ts();
        model.submitted_at = Set(now);
        model.updated_at = Set(now);
        Ok(Some(model.update(&self.db).await?.into_submission()))
    }

    async fn grade_submission(
        &self,
        id: i64,
        marks_awarded: f64,
        feedback: Option<String>,
    ) -> Result<Option<Submission>> {
        let Some(existing) = self.find_live::<Submissions>(id, false).await? else {
            return Ok(None);
        };

        let now = now_ts();
        let mut model = ActiveModel::from(existing);
        model.marks_awarded = Set(Some(marks_awarded));
        model.feedback = Set(feedback);
        model.status = Set(SubmissionStatus::Graded.as_str().to_string());
        model.graded_at = Set(Some(now));
        model.updated_at = Set(now);
        Ok(Some(model.update(&self.db).await?.into_submission()))
    }

    async fn set_submission_deleted(
        &self,
        id: i64,
        deleted: bool,
    ) -> Result<Option<Submission>> {
        let model = self.set_deleted::<Submissions>(id, deleted).await?;
        Ok(model.map(|m| m.into_submission()))
    }

    async fn submission_statistics(
        &self,
        assignment: &Assignment,
    ) -> Result<SubmissionStatistics> {
        // 计数与选课总数在同一事务内读取
        let txn = self.db.begin().await?;

        let live = Condition::all()
            .add(Column::AssignmentId.eq(assignment.id))
            .add(Column::IsDeleted.eq(false));
        let graded = live
            .clone()
            .add(Column::Status.eq(SubmissionStatus::Graded.as_str()));

        let total_submissions = Submissions::find().filter(live.clone()).count(&txn).await?;
        let graded_submissions = Submissions::find().filter(graded.clone()).count(&txn).await?;
        let pending_submissions = Submissions::find()
            .filter(live.clone())
            .filter(Column::Status.is_in([
                SubmissionStatus::Submitted.as_str(),
                SubmissionStatus::PendingReview.as_str(),
            ]))
            .count(&txn)
            .await?;
        let late_submissions = Submissions::find()
            .filter(live)
            .filter(Column::SubmittedAt.gt(assignment.due_date.timestamp()))
            .count(&txn)
            .await?;

        let (average, highest, lowest) = Submissions::find()
            .select_only()
            .column_as(SimpleExpr::from(Func::avg(Expr::col(Column::MarksAwarded))), "average")
            .column_as(Column::MarksAwarded.max(), "highest")
            .column_as(Column::MarksAwarded.min(), "lowest")
            .filter(graded)
            .into_tuple::<(Option<f64>, Option<f64>, Option<f64>)>()
            .one(&txn)
            .await?
            .unwrap_or_default();

        let total_enrolled = course_enrollments::Entity::find()
            .filter(course_enrollments::Column::CourseId.eq(assignment.course_id))
            .count(&txn)
            .await?;

        txn.commit().await?;

        Ok(SubmissionStatistics {
            total_submissions,
            graded_submissions,
            pending_submissions,
            late_submissions,
            on_time_submissions: total_submissions.saturating_sub(late_submissions),
            submission_rate: SubmissionStatistics::rate(total_submissions, total_enrolled),
            average_marks: format!("{:.2}", average.unwrap_or_default()),
            highest_marks: highest.unwrap_or_default(),
            lowest_marks: lowest.unwrap_or_default(),
            total_marks: assignment.total_marks,
            total_enrolled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, Fixture};
    use chrono::{Duration, Utc};

    fn new_submission(assignment_id: i64, student_id: i64) -> NewSubmission {
        NewSubmission {
            assignment_id,
            student_id,
            content: Some("Answer".into()),
            file_path: None,
            status: SubmissionStatus::Submitted,
        }
    }

    #[tokio::test]
    async fn test_deleted_submission_is_reused() {
        let fx = Fixture::new().await;
        let subject = testing::subject(&fx, "3140702").await;
        let faculty = testing::faculty(&fx, "mehta@college.edu", "Prof. Mehta").await;
        let course = testing::course(&fx, subject.id, faculty.id).await;
        let assignment =
            testing::assignment(&fx, course.id, Utc::now() + Duration::days(7), 10.0).await;
        let student = testing::student(&fx, "22CE001", "Aarav Patel").await;

        let first = fx
            .storage
            .create_submission(new_submission(assignment.id, student.id))
            .await
            .unwrap();
        fx.storage
            .set_submission_deleted(first.id, true)
            .await
            .unwrap();
        assert!(
            fx.storage
                .find_student_submission(assignment.id, student.id)
                .await
                .unwrap()
                .is_none()
        );

        let second = fx
            .storage
            .create_submission(new_submission(assignment.id, student.id))
            .await
            .unwrap();
        assert_eq!(second.id, first.id);
        assert!(!second.is_deleted);
    }

    #[tokio::test]
    async fn test_statistics() {
        let fx = Fixture::new().await;
        let subject = testing::subject(&fx, "3140702").await;
        let faculty = testing::faculty(&fx, "mehta@college.edu", "Prof. Mehta").await;
        let course = testing::course(&fx, subject.id, faculty.id).await;
        let assignment =
            testing::assignment(&fx, course.id, Utc::now() + Duration::days(7), 10.0).await;

        let mut students = Vec::new();
        for (enrollment, name) in [
            ("22CE001", "Aarav Patel"),
            ("22CE002", "Diya Mehta"),
            ("22CE003", "Kabir Shah"),
        ] {
            students.push(testing::student(&fx, enrollment, name).await.id);
        }
        fx.storage
            .enroll_students(course.id, students.clone())
            .await
            .unwrap();

        let graded = fx
            .storage
            .create_submission(new_submission(assignment.id, students[0]))
            .await
            .unwrap();
        fx.storage
            .grade_submission(graded.id, 7.5, Some("Good".into()))
            .await
            .unwrap();
        fx.storage
            .create_submission(new_submission(assignment.id, students[1]))
            .await
            .unwrap();

        let stats = fx.storage.submission_statistics(&assignment).await.unwrap();
        assert_eq!(stats.total_submissions, 2);
        assert_eq!(stats.graded_submissions, 1);
        assert_eq!(stats.pending_submissions, 1);
        assert_eq!(stats.late_submissions, 0);
        assert_eq!(stats.on_time_submissions, 2);
        assert_eq!(stats.submission_rate, "66.7%");
        assert_eq!(stats.average_marks, "7.50");
        assert_eq!(stats.highest_marks, 7.5);
        assert_eq!(stats.total_enrolled, 3);
    }
}
