//! 考试成绩实体（硬删除）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exam_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub exam_id: i64,
    pub student_id: Option<i64>,
    pub student_enrollment_number: String,
    pub spi: f64,
    pub cpi: f64,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::exams::Entity",
        from = "Column::ExamId",
        to = "super::exams::Column::Id"
    )]
    Exam,
    #[sea_orm(has_many = "super::exam_subject_results::Entity")]
    SubjectResults,
}

impl Related<super::exams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exam.def()
    }
}

impl Related<super::exam_subject_results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubjectResults.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_exam_result(
        self,
        subject_results: Vec<super::exam_subject_results::Model>,
    ) -> crate::models::exam_results::entities::ExamResult {
        use crate::models::common::enums::ResultStatus;

        crate::models::exam_results::entities::ExamResult {
            id: self.id,
            exam_id: self.exam_id,
            student_id: self.student_id,
            student_enrollment_number: self.student_enrollment_number,
            spi: self.spi,
            cpi: self.cpi,
            status: self
                .status
                .parse::<ResultStatus>()
                .unwrap_or(ResultStatus::Fail),
            subject_results: subject_results
                .into_iter()
                .map(|r| r.into_subject_result())
                .collect(),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
