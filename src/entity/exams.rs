//! 考试实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub exam_type: String,
    pub semester_id: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub max_marks: Option<f64>,
    pub passing_marks: Option<f64>,
    pub exam_date: Option<i64>,
    pub duration: Option<i32>,
    pub is_published: bool,
    pub is_deleted: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::semesters::Entity",
        from = "Column::SemesterId",
        to = "super::semesters::Column::Id"
    )]
    Semester,
    #[sea_orm(has_many = "super::exam_results::Entity")]
    ExamResults,
}

impl Related<super::semesters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Semester.def()
    }
}

impl Related<super::exam_results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExamResults.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_exam(self) -> crate::models::exams::entities::Exam {
        use crate::models::common::enums::ExamType;

        crate::models::exams::entities::Exam {
            id: self.id,
            name: self.name,
            exam_type: self
                .exam_type
                .parse::<ExamType>()
                .unwrap_or(ExamType::Midterm),
            semester_id: self.semester_id,
            description: self.description,
            max_marks: self.max_marks,
            passing_marks: self.passing_marks,
            exam_date: self.exam_date.map(super::to_datetime),
            duration: self.duration,
            is_published: self.is_published,
            is_deleted: self.is_deleted,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
