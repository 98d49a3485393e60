//! 证书实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "certificates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub title: String,
    pub issuing_organization: String,
    /// YYYY-MM-DD
    pub issue_date: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub certificate_path: String,
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
    pub fn into_certificate(self) -> crate::models::certificates::entities::Certificate {
        crate::models::certificates::entities::Certificate {
            id: self.id,
            student_id: self.student_id,
            title: self.title,
            issuing_organization: self.issuing_organization,
            issue_date: self.issue_date,
            description: self.description,
            certificate_path: self.certificate_path,
            is_deleted: self.is_deleted,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
