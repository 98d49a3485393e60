use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 实习记录
        manager
            .create_table(
                Table::create()
                    .table(Internships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Internships::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Internships::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Internships::CompanyName).string().not_null())
                    .col(ColumnDef::new(Internships::Role).string().not_null())
                    .col(ColumnDef::new(Internships::Description).text().null())
                    .col(
                        ColumnDef::new(Internships::StartDate)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Internships::EndDate).string_len(10).null())
                    .col(
                        ColumnDef::new(Internships::Status)
                            .string()
                            .not_null()
                            .default("APPLIED"),
                    )
                    .col(ColumnDef::new(Internships::Stipend).double().null())
                    .col(ColumnDef::new(Internships::Location).string().null())
                    .col(ColumnDef::new(Internships::OfferLetterPath).string().null())
                    .col(ColumnDef::new(Internships::NocPath).string().null())
                    .col(
                        ColumnDef::new(Internships::CompletionCertificatePath)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Internships::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Internships::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Internships::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Internships::Table, Internships::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_internships_student_id")
                    .table(Internships::Table)
                    .col(Internships::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_internships_status")
                    .table(Internships::Table)
                    .col(Internships::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Internships::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Internships {
    #[sea_orm(iden = "internships")]
    Table,
    Id,
    StudentId,
    CompanyName,
    Role,
    Description,
    StartDate,
    EndDate,
    Status,
    Stipend,
    Location,
    OfferLetterPath,
    NocPath,
    CompletionCertificatePath,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}
