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

fn unique_index<T, C>(name: &str, table: T, cols: Vec<C>) -> IndexCreateStatement
where
    T: IntoIden,
    C: IntoIden,
{
    let mut index = Index::create();
    index.if_not_exists().name(name).table(table).unique();
    for col in cols {
        index.col(col);
    }
    index.to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 开课（科目 + 教师 + 学期 + 分班）
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(id(Courses::Id))
                    .col(reference(Courses::SubjectId))
                    .col(reference(Courses::FacultyId))
                    .col(reference(Courses::SemesterId))
                    .col(reference(Courses::DivisionId))
                    .col(ColumnDef::new(Courses::LectureType).string().not_null())
                    .col(
                        ColumnDef::new(Courses::Batch)
                            .string()
                            .not_null()
                            .default("-"),
                    )
                    .col(deleted_flag(Courses::IsDeleted))
                    .col(timestamp(Courses::CreatedAt))
                    .col(timestamp(Courses::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::SubjectId)
                            .to(Subjects::Table, Subjects::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::FacultyId)
                            .to(Faculties::Table, Faculties::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::SemesterId)
                            .to(Semesters::Table, Semesters::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::DivisionId)
                            .to(Divisions::Table, Divisions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(unique_index(
                "uq_courses_allocation",
                Courses::Table,
                vec![
                    Courses::SubjectId,
                    Courses::FacultyId,
                    Courses::SemesterId,
                    Courses::DivisionId,
                    Courses::LectureType,
                    Courses::Batch,
                ],
            ))
            .await?;

        // 选课
        manager
            .create_table(
                Table::create()
                    .table(CourseEnrollments::Table)
                    .if_not_exists()
                    .col(id(CourseEnrollments::Id))
                    .col(reference(CourseEnrollments::StudentId))
                    .col(reference(CourseEnrollments::CourseId))
                    .col(timestamp(CourseEnrollments::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseEnrollments::Table, CourseEnrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseEnrollments::Table, CourseEnrollments::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(unique_index(
                "uq_course_enrollments_student_course",
                CourseEnrollments::Table,
                vec![CourseEnrollments::StudentId, CourseEnrollments::CourseId],
            ))
            .await?;

        // 考试
        manager
            .create_table(
                Table::create()
                    .table(Exams::Table)
                    .if_not_exists()
                    .col(id(Exams::Id))
                    .col(ColumnDef::new(Exams::Name).string().not_null())
                    .col(ColumnDef::new(Exams::ExamType).string().not_null())
                    .col(reference(Exams::SemesterId))
                    .col(ColumnDef::new(Exams::Description).text().null())
                    .col(ColumnDef::new(Exams::MaxMarks).double().null())
                    .col(ColumnDef::new(Exams::PassingMarks).double().null())
                    .col(ColumnDef::new(Exams::ExamDate).big_integer().null())
                    .col(ColumnDef::new(Exams::Duration).integer().null())
                    .col(
                        ColumnDef::new(Exams::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(deleted_flag(Exams::IsDeleted))
                    .col(timestamp(Exams::CreatedAt))
                    .col(timestamp(Exams::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Exams::Table, Exams::SemesterId)
                            .to(Semesters::Table, Semesters::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(unique_index(
                "uq_exams_semester_type",
                Exams::Table,
                vec![Exams::SemesterId, Exams::ExamType],
            ))
            .await?;

        // 考试成绩
        manager
            .create_table(
                Table::create()
                    .table(ExamResults::Table)
                    .if_not_exists()
                    .col(id(ExamResults::Id))
                    .col(reference(ExamResults::ExamId))
                    .col(ColumnDef::new(ExamResults::StudentId).big_integer().null())
                    .col(
                        ColumnDef::new(ExamResults::StudentEnrollmentNumber)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExamResults::Spi).double().not_null())
                    .col(ColumnDef::new(ExamResults::Cpi).double().not_null())
                    .col(ColumnDef::new(ExamResults::Status).string().not_null())
                    .col(timestamp(ExamResults::CreatedAt))
                    .col(timestamp(ExamResults::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamResults::Table, ExamResults::ExamId)
                            .to(Exams::Table, Exams::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamResults::Table, ExamResults::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(unique_index(
                "uq_exam_results_exam_enrollment",
                ExamResults::Table,
                vec![ExamResults::ExamId, ExamResults::StudentEnrollmentNumber],
            ))
            .await?;

        // 成绩明细
        manager
            .create_table(
                Table::create()
                    .table(ExamSubjectResults::Table)
                    .if_not_exists()
                    .col(id(ExamSubjectResults::Id))
                    .col(reference(ExamSubjectResults::ExamResultId))
                    .col(reference(ExamSubjectResults::SubjectId))
                    .col(ColumnDef::new(ExamSubjectResults::Grade).string().not_null())
                    .col(
                        ColumnDef::new(ExamSubjectResults::Credits)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamSubjectResults::Table, ExamSubjectResults::ExamResultId)
                            .to(ExamResults::Table, ExamResults::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamSubjectResults::Table, ExamSubjectResults::SubjectId)
                            .to(Subjects::Table, Subjects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 考勤
        manager
            .create_table(
                Table::create()
                    .table(Attendances::Table)
                    .if_not_exists()
                    .col(id(Attendances::Id))
                    .col(reference(Attendances::CourseId))
                    .col(reference(Attendances::StudentId))
                    .col(ColumnDef::new(Attendances::Date).string_len(10).not_null())
                    .col(ColumnDef::new(Attendances::Status).string().not_null())
                    .col(timestamp(Attendances::CreatedAt))
                    .col(timestamp(Attendances::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendances::Table, Attendances::CourseId)
                            .to(Courses::Table, Courses::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendances::Table, Attendances::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(unique_index(
                "uq_attendances_course_student_date",
                Attendances::Table,
                vec![
                    Attendances::CourseId,
                    Attendances::StudentId,
                    Attendances::Date,
                ],
            ))
            .await?;

        // 作业
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(id(Assignments::Id))
                    .col(reference(Assignments::CourseId))
                    .col(ColumnDef::new(Assignments::Title).string().not_null())
                    .col(ColumnDef::new(Assignments::Description).text().null())
                    .col(timestamp(Assignments::DueDate))
                    .col(ColumnDef::new(Assignments::TotalMarks).double().not_null())
                    .col(deleted_flag(Assignments::IsDeleted))
                    .col(timestamp(Assignments::CreatedAt))
                    .col(timestamp(Assignments::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::CourseId)
                            .to(Courses::Table, Courses::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 作业提交
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(id(Submissions::Id))
                    .col(reference(Submissions::AssignmentId))
                    .col(reference(Submissions::StudentId))
                    .col(ColumnDef::new(Submissions::Content).text().null())
                    .col(ColumnDef::new(Submissions::FilePath).string().null())
                    .col(ColumnDef::new(Submissions::Status).string().not_null())
                    .col(ColumnDef::new(Submissions::MarksAwarded).double().null())
                    .col(ColumnDef::new(Submissions::Feedback).text().null())
                    .col(timestamp(Submissions::SubmittedAt))
                    .col(ColumnDef::new(Submissions::GradedAt).big_integer().null())
                    .col(deleted_flag(Submissions::IsDeleted))
                    .col(timestamp(Submissions::CreatedAt))
                    .col(timestamp(Submissions::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::AssignmentId)
                            .to(Assignments::Table, Assignments::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(unique_index(
                "uq_submissions_assignment_student",
                Submissions::Table,
                vec![Submissions::AssignmentId, Submissions::StudentId],
            ))
            .await?;

        // 证书
        manager
            .create_table(
                Table::create()
                    .table(Certificates::Table)
                    .if_not_exists()
                    .col(id(Certificates::Id))
                    .col(reference(Certificates::StudentId))
                    .col(ColumnDef::new(Certificates::Title).string().not_null())
                    .col(
                        ColumnDef::new(Certificates::IssuingOrganization)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Certificates::IssueDate)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Certificates::Description).text().null())
                    .col(
                        ColumnDef::new(Certificates::CertificatePath)
                            .string()
                            .not_null(),
                    )
                    .col(deleted_flag(Certificates::IsDeleted))
                    .col(timestamp(Certificates::CreatedAt))
                    .col(timestamp(Certificates::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Certificates::Table, Certificates::StudentId)
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
                    .name("idx_certificates_student_id")
                    .table(Certificates::Table)
                    .col(Certificates::StudentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Certificates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Attendances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExamSubjectResults::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExamResults::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Exams::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CourseEnrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Semesters {
    #[sea_orm(iden = "semesters")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Subjects {
    #[sea_orm(iden = "subjects")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Divisions {
    #[sea_orm(iden = "divisions")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Faculties {
    #[sea_orm(iden = "faculties")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Courses {
    #[sea_orm(iden = "courses")]
    Table,
    Id,
    SubjectId,
    FacultyId,
    SemesterId,
    DivisionId,
    LectureType,
    Batch,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CourseEnrollments {
    #[sea_orm(iden = "course_enrollments")]
    Table,
    Id,
    StudentId,
    CourseId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Exams {
    #[sea_orm(iden = "exams")]
    Table,
    Id,
    Name,
    ExamType,
    SemesterId,
    Description,
    MaxMarks,
    PassingMarks,
    ExamDate,
    Duration,
    IsPublished,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ExamResults {
    #[sea_orm(iden = "exam_results")]
    Table,
    Id,
    ExamId,
    StudentId,
    StudentEnrollmentNumber,
    Spi,
    Cpi,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ExamSubjectResults {
    #[sea_orm(iden = "exam_subject_results")]
    Table,
    Id,
    ExamResultId,
    SubjectId,
    Grade,
    Credits,
}

#[derive(DeriveIden)]
enum Attendances {
    #[sea_orm(iden = "attendances")]
    Table,
    Id,
    CourseId,
    StudentId,
    Date,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Assignments {
    #[sea_orm(iden = "assignments")]
    Table,
    Id,
    CourseId,
    Title,
    Description,
    DueDate,
    TotalMarks,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Submissions {
    #[sea_orm(iden = "submissions")]
    Table,
    Id,
    AssignmentId,
    StudentId,
    Content,
    FilePath,
    Status,
    MarksAwarded,
    Feedback,
    SubmittedAt,
    GradedAt,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Certificates {
    #[sea_orm(iden = "certificates")]
    Table,
    Id,
    StudentId,
    Title,
    IssuingOrganization,
    IssueDate,
    Description,
    CertificatePath,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}
