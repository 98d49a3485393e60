use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn id<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn reference<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).big_integer().not_null().to_owned()
}

fn timestamp<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).big_integer().not_null().to_owned()
}

fn deleted_flag<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .boolean()
        .not_null()
        .default(false)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 用户账号
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(id(Users::Id))
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::FullName).string().null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(deleted_flag(Users::IsDeleted))
                    .col(timestamp(Users::CreatedAt))
                    .col(timestamp(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // 学院
        manager
            .create_table(
                Table::create()
                    .table(Colleges::Table)
                    .if_not_exists()
                    .col(id(Colleges::Id))
                    .col(ColumnDef::new(Colleges::Name).string().not_null().unique_key())
                    .col(
                        ColumnDef::new(Colleges::Abbreviation)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Colleges::Website).string().null())
                    .col(ColumnDef::new(Colleges::Address).text().null())
                    .col(deleted_flag(Colleges::IsDeleted))
                    .col(timestamp(Colleges::CreatedAt))
                    .col(timestamp(Colleges::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // 院系
        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(id(Departments::Id))
                    .col(ColumnDef::new(Departments::Name).string().not_null())
                    .col(ColumnDef::new(Departments::Abbreviation).string().not_null())
                    .col(reference(Departments::CollegeId))
                    .col(deleted_flag(Departments::IsDeleted))
                    .col(timestamp(Departments::CreatedAt))
                    .col(timestamp(Departments::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Departments::Table, Departments::CollegeId)
                            .to(Colleges::Table, Colleges::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_departments_college_name")
                    .table(Departments::Table)
                    .col(Departments::CollegeId)
                    .col(Departments::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 学年
        manager
            .create_table(
                Table::create()
                    .table(AcademicYears::Table)
                    .if_not_exists()
                    .col(id(AcademicYears::Id))
                    .col(
                        ColumnDef::new(AcademicYears::Year)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(reference(AcademicYears::CollegeId))
                    .col(
                        ColumnDef::new(AcademicYears::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(deleted_flag(AcademicYears::IsDeleted))
                    .col(timestamp(AcademicYears::CreatedAt))
                    .col(timestamp(AcademicYears::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(AcademicYears::Table, AcademicYears::CollegeId)
                            .to(Colleges::Table, Colleges::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_academic_years_college_active")
                    .table(AcademicYears::Table)
                    .col(AcademicYears::CollegeId)
                    .col(AcademicYears::IsActive)
                    .to_owned(),
            )
            .await?;

        // 学期
        manager
            .create_table(
                Table::create()
                    .table(Semesters::Table)
                    .if_not_exists()
                    .col(id(Semesters::Id))
                    .col(
                        ColumnDef::new(Semesters::SemesterNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Semesters::SemesterType).string().not_null())
                    .col(reference(Semesters::DepartmentId))
                    .col(reference(Semesters::AcademicYearId))
                    .col(deleted_flag(Semesters::IsDeleted))
                    .col(timestamp(Semesters::CreatedAt))
                    .col(timestamp(Semesters::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Semesters::Table, Semesters::DepartmentId)
                            .to(Departments::Table, Departments::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Semesters::Table, Semesters::AcademicYearId)
                            .to(AcademicYears::Table, AcademicYears::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_semesters_department_year_number")
                    .table(Semesters::Table)
                    .col(Semesters::DepartmentId)
                    .col(Semesters::AcademicYearId)
                    .col(Semesters::SemesterNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 科目
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(id(Subjects::Id))
                    .col(ColumnDef::new(Subjects::Name).string().not_null())
                    .col(ColumnDef::new(Subjects::Abbreviation).string().null())
                    .col(ColumnDef::new(Subjects::Code).string().not_null())
                    .col(ColumnDef::new(Subjects::SubjectType).string().not_null())
                    .col(reference(Subjects::DepartmentId))
                    .col(reference(Subjects::SemesterId))
                    .col(deleted_flag(Subjects::IsDeleted))
                    .col(timestamp(Subjects::CreatedAt))
                    .col(timestamp(Subjects::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Subjects::Table, Subjects::DepartmentId)
                            .to(Departments::Table, Departments::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Subjects::Table, Subjects::SemesterId)
                            .to(Semesters::Table, Semesters::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_subjects_code_department_semester")
                    .table(Subjects::Table)
                    .col(Subjects::Code)
                    .col(Subjects::DepartmentId)
                    .col(Subjects::SemesterId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 分班
        manager
            .create_table(
                Table::create()
                    .table(Divisions::Table)
                    .if_not_exists()
                    .col(id(Divisions::Id))
                    .col(ColumnDef::new(Divisions::Name).string().not_null())
                    .col(reference(Divisions::SemesterId))
                    .col(deleted_flag(Divisions::IsDeleted))
                    .col(timestamp(Divisions::CreatedAt))
                    .col(timestamp(Divisions::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Divisions::Table, Divisions::SemesterId)
                            .to(Semesters::Table, Semesters::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_divisions_semester_name")
                    .table(Divisions::Table)
                    .col(Divisions::SemesterId)
                    .col(Divisions::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 教师档案
        manager
            .create_table(
                Table::create()
                    .table(Faculties::Table)
                    .if_not_exists()
                    .col(id(Faculties::Id))
                    .col(
                        ColumnDef::new(Faculties::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Faculties::FullName).string().not_null())
                    .col(ColumnDef::new(Faculties::Designation).string().null())
                    .col(reference(Faculties::DepartmentId))
                    .col(deleted_flag(Faculties::IsDeleted))
                    .col(timestamp(Faculties::CreatedAt))
                    .col(timestamp(Faculties::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Faculties::Table, Faculties::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Faculties::Table, Faculties::DepartmentId)
                            .to(Departments::Table, Departments::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 学生档案
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(id(Students::Id))
                    .col(
                        ColumnDef::new(Students::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::FullName).string().not_null())
                    .col(
                        ColumnDef::new(Students::EnrollmentNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(reference(Students::DepartmentId))
                    .col(reference(Students::SemesterId))
                    .col(reference(Students::DivisionId))
                    .col(ColumnDef::new(Students::Batch).string().null())
                    .col(deleted_flag(Students::IsDeleted))
                    .col(timestamp(Students::CreatedAt))
                    .col(timestamp(Students::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::DepartmentId)
                            .to(Departments::Table, Departments::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::SemesterId)
                            .to(Semesters::Table, Semesters::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::DivisionId)
                            .to(Divisions::Table, Divisions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Faculties::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Divisions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Semesters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AcademicYears::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Colleges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Email,
    FullName,
    Role,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Colleges {
    #[sea_orm(iden = "colleges")]
    Table,
    Id,
    Name,
    Abbreviation,
    Website,
    Address,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Departments {
    #[sea_orm(iden = "departments")]
    Table,
    Id,
    Name,
    Abbreviation,
    CollegeId,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AcademicYears {
    #[sea_orm(iden = "academic_years")]
    Table,
    Id,
    Year,
    CollegeId,
    IsActive,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Semesters {
    #[sea_orm(iden = "semesters")]
    Table,
    Id,
    SemesterNumber,
    SemesterType,
    DepartmentId,
    AcademicYearId,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Subjects {
    #[sea_orm(iden = "subjects")]
    Table,
    Id,
    Name,
    Abbreviation,
    Code,
    SubjectType,
    DepartmentId,
    SemesterId,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Divisions {
    #[sea_orm(iden = "divisions")]
    Table,
    Id,
    Name,
    SemesterId,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Faculties {
    #[sea_orm(iden = "faculties")]
    Table,
    Id,
    UserId,
    FullName,
    Designation,
    DepartmentId,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    UserId,
    FullName,
    EnrollmentNumber,
    DepartmentId,
    SemesterId,
    DivisionId,
    Batch,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}
