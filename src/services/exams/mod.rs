pub mod create;
pub mod delete;
pub mod update;

use std::sync::Arc;

use crate::errors::{Result, TrackademyError};
use crate::models::ExamType;
use crate::models::exams::{
    entities::Exam,
    requests::{CreateExamRequest, ExamListQuery, ExamSearchQuery, UpdateExamRequest},
    responses::ExamDetail,
};
use crate::storage::Storage;

pub const EXAM_NOT_FOUND: &str = "Exam not found.";

fn type_taken(exam_type: ExamType) -> TrackademyError {
    TrackademyError::conflict(format!(
        "An exam of type '{exam_type}' already exists for this semester."
    ))
}

pub struct ExamService {
    storage: Arc<dyn Storage>,
}

impl ExamService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub async fn create_exam(&self, req: CreateExamRequest) -> Result<Exam> {
        create::create_exam(self, req).await
    }

    pub async fn list_exams(&self, query: ExamListQuery) -> Result<Vec<Exam>> {
        self.storage.list_exams(query).await
    }

    pub async fn count_exams(&self, query: ExamListQuery) -> Result<u64> {
        self.storage.count_exams(query).await
    }

    pub async fn search_exams(&self, query: ExamSearchQuery) -> Result<Vec<Exam>> {
        self.storage.search_exams(query).await
    }

    pub async fn published_exams(&self) -> Result<Vec<Exam>> {
        self.list_exams(ExamListQuery {
            is_published: Some(true),
            ..Default::default()
        })
        .await
    }

    pub async fn exams_by_type(&self, exam_type: ExamType) -> Result<Vec<Exam>> {
        self.list_exams(ExamListQuery {
            exam_type: Some(exam_type),
            ..Default::default()
        })
        .await
    }

    pub async fn exams_by_semester(&self, semester_id: i64) -> Result<Vec<Exam>> {
        self.list_exams(ExamListQuery {
            semester_id: Some(semester_id),
            ..Default::default()
        })
        .await
    }

    pub async fn exams_by_department(&self, department_id: i64) -> Result<Vec<Exam>> {
        self.list_exams(ExamListQuery {
            department_id: Some(department_id),
            ..Default::default()
        })
        .await
    }

    pub async fn get_exam(&self, id: i64, with_relations: bool) -> Result<ExamDetail> {
        let exam = self
            .storage
            .get_exam(id, false)
            .await?
            .ok_or_else(|| TrackademyError::not_found(EXAM_NOT_FOUND))?;
        let semester = if with_relations {
            self.storage.get_semester(exam.semester_id, true).await?
        } else {
            None
        };
        Ok(ExamDetail { exam, semester })
    }

    pub async fn update_exam(&self, id: i64, req: UpdateExamRequest) -> Result<Exam> {
        update::update_exam(self, id, req).await
    }

    pub async fn set_published(&self, id: i64, published: bool) -> Result<Exam> {
        update::set_published(self, id, published).await
    }

    pub async fn delete_exam(&self, id: i64) -> Result<()> {
        delete::delete_exam(self, id).await
    }

    pub async fn hard_delete_exam(&self, id: i64) -> Result<()> {
        delete::hard_delete_exam(self, id).await
    }

    pub async fn restore_exam(&self, id: i64) -> Result<Exam> {
        self.storage
            .set_exam_deleted(id, false)
            .await?
            .ok_or_else(|| TrackademyError::not_found(EXAM_NOT_FOUND))
    }
}
