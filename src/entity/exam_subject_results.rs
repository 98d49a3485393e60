//! 成绩明细实体，随成绩级联删除

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exam_subject_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub exam_result_id: i64,
    pub subject_id: i64,
    pub grade: String,
    pub credits: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::exam_results::Entity",
        from = "Column::ExamResultId",
        to = "super::exam_results::Column::Id",
        on_delete = "Cascade"
    )]
    ExamResult,
}

impl Related<super::exam_results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExamResult.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_subject_result(self) -> crate::models::exam_results::entities::SubjectResult {
        crate::models::exam_results::entities::SubjectResult {
            id: self.id,
            subject_id: self.subject_id,
            grade: self.grade,
            credits: self.credits,
        }
    }
}
