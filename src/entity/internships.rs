//! 实习实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "internships")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub company_name: String,
    pub role: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// YYYY-MM-DD
    pub start_date: String,
    pub end_date: Option<String>,
    pub status: String,
    pub stipend: Option<f64>,
    pub location: Option<String>,
    pub offer_letter_path: Option<String>,
    pub noc_path: Option<String>,
    pub completion_certificate_path: Option<String>,
    pub is_deleted: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_internship(self) -> crate::models::internships::entities::Internship {
        use crate::models::common::enums::InternshipStatus;

        crate::models::internships::entities::Internship {
            id: self.id,
            student_id: self.student_id,
            company_name: self.company_name,
            role: self.role,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            status: self
                .status
                .parse::<InternshipStatus>()
                .unwrap_or(InternshipStatus::Applied),
            stipend: self.stipend,
            location: self.location,
            offer_letter_path: self.offer_letter_path,
            noc_path: self.noc_path,
            completion_certificate_path: self.completion_certificate_path,
            is_deleted: self.is_deleted,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
