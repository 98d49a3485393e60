//! 用户、学生档案、教师档案的存储操作

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::{SeaOrmStorage, now_ts};
use crate::entity::{faculties, students, users};
use crate::errors::Result;
use crate::models::{
    UserRole,
    faculty::{
        entities::Faculty,
        requests::{CreateFacultyRequest, FacultyListQuery, UpdateFacultyRequest},
    },
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
    },
    users::{entities::User, requests::CreateUserRequest},
};
use crate::storage::UserStorage;
use crate::utils::sql::{contains_pattern, search_term};

/// 在给定连接（或事务）上写入账号
async fn insert_user<C: ConnectionTrait>(
    db: &C,
    email: String,
    full_name: Option<String>,
    role: UserRole,
) -> Result<users::Model> {
    let now = now_ts();
    let model = users::ActiveModel {
        email: Set(email),
        full_name: Set(full_name),
        role: Set(role.as_str().to_string()),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// 档案改名后同步账号姓名
async fn rename_user<C: ConnectionTrait>(db: &C, user_id: i64, full_name: &str) -> Result<()> {
    users::Entity::update_many()
        .col_expr(users::Column::FullName, Expr::value(full_name))
        .col_expr(users::Column::UpdatedAt, Expr::value(now_ts()))
        .filter(users::Column::Id.eq(user_id))
        .exec(db)
        .await?;
    Ok(())
}

fn student_condition(query: &StudentListQuery) -> Condition {
    let mut condition = Condition::all().add(students::Column::IsDeleted.eq(false));
    if let Some(department_id) = query.department_id {
        condition = condition.add(students::Column::DepartmentId.eq(department_id));
    }
    if let Some(semester_id) = query.semester_id {
        condition = condition.add(students::Column::SemesterId.eq(semester_id));
    }
    if let Some(division_id) = query.division_id {
        condition = condition.add(students::Column::DivisionId.eq(division_id));
    }
    if let Some(term) = search_term(query.search.as_deref()) {
        condition = condition.add(
            Condition::any()
                .add(students::Column::FullName.like(contains_pattern(&term)))
                .add(students::Column::EnrollmentNumber.like(contains_pattern(&term))),
        );
    }
    condition
}

#[async_trait]
impl UserStorage for SeaOrmStorage {
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        let model = insert_user(&self.db, user.email, user.full_name, user.role).await?;
        Ok(model.into_user())
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let model = users::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(|m| m.into_user()))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.into_user()))
    }

    async fn count_users(&self) -> Result<u64> {
        Ok(users::Entity::find().count(&self.db).await?)
    }

    async fn set_user_deleted(&self, id: i64, deleted: bool) -> Result<Option<User>> {
        let model = self.set_deleted::<users::Entity>(id, deleted).await?;
        Ok(model.map(|m| m.into_user()))
    }

    async fn create_student(&self, req: CreateStudentRequest) -> Result<Student> {
        let txn = self.db.begin().await?;

        let user = insert_user(
            &txn,
            req.email,
            Some(req.full_name.clone()),
            UserRole::Student,
        )
        .await?;

        let now = now_ts();
        let student = students::ActiveModel {
            user_id: Set(user.id),
            full_name: Set(req.full_name),
            enrollment_number: Set(req.enrollment_number),
            department_id: Set(req.department_id),
            semester_id: Set(req.semester_id),
            division_id: Set(req.division_id),
            batch: Set(req.batch),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(student.into_student())
    }

    async fn get_student(&self, id: i64) -> Result<Option<Student>> {
        let model = self.find_live::<students::Entity>(id, false).await?;
        Ok(model.map(|m| m.into_student()))
    }

    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>> {
        let model = students::Entity::find()
            .filter(students::Column::UserId.eq(user_id))
            .filter(students::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.into_student()))
    }

    async fn get_student_by_enrollment_number(
        &self,
        enrollment: &str,
    ) -> Result<Option<Student>> {
        let model = students::Entity::find()
            .filter(students::Column::EnrollmentNumber.eq(enrollment))
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.into_student()))
    }

    async fn list_students(&self, query: StudentListQuery) -> Result<Vec<Student>> {
        let models = students::Entity::find()
            .filter(student_condition(&query))
            .order_by_asc(students::Column::EnrollmentNumber)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into_student()).collect())
    }

    async fn update_student(
        &self,
        id: i64,
        req: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        let Some(existing) = self.find_live::<students::Entity>(id, false).await? else {
            return Ok(None);
        };
        let user_id = existing.user_id;

        let txn = self.db.begin().await?;
        let mut model = students::ActiveModel::from(existing);
        if let Some(full_name) = &req.full_name {
            model.full_name = Set(full_name.clone());
            rename_user(&txn, user_id, full_name).await?;
        }
        if let Some(batch) = req.batch {
            model.batch = Set(Some(batch));
        }
        if let Some(department_id) = req.department_id {
            model.department_id = Set(department_id);
        }
        if let Some(semester_id) = req.semester_id {
            model.semester_id = Set(semester_id);
        }
        if let Some(division_id) = req.division_id {
            model.division_id = Set(division_id);
        }
        model.updated_at = Set(now_ts());
        let student = model.update(&txn).await?;
        txn.commit().await?;
        Ok(Some(student.into_student()))
    }

    async fn set_student_deleted(&self, id: i64, deleted: bool) -> Result<Option<Student>> {
        let model = self.set_deleted::<students::Entity>(id, deleted).await?;
        Ok(model.map(|m| m.into_student()))
    }

    async fn create_faculty(&self, req: CreateFacultyRequest) -> Result<Faculty> {
        let txn = self.db.begin().await?;

        let user = insert_user(
            &txn,
            req.email,
            Some(req.full_name.clone()),
            UserRole::Faculty,
        )
        .await?;

        let now = now_ts();
        let faculty = faculties::ActiveModel {
            user_id: Set(user.id),
            full_name: Set(req.full_name),
            designation: Set(req.designation),
            department_id: Set(req.department_id),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(faculty.into_faculty())
    }

    async fn get_faculty(&self, id: i64) -> Result<Option<Faculty>> {
        let model = self.find_live::<faculties::Entity>(id, false).await?;
        Ok(model.map(|m| m.into_faculty()))
    }

    async fn get_faculty_by_user_id(&self, user_id: i64) -> Result<Option<Faculty>> {
        let model = faculties::Entity::find()
            .filter(faculties::Column::UserId.eq(user_id))
            .filter(faculties::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.into_faculty()))
    }

    async fn list_faculty(&self, query: FacultyListQuery) -> Result<Vec<Faculty>> {
        let mut select =
            faculties::Entity::find().filter(faculties::Column::IsDeleted.eq(false));
        if let Some(department_id) = query.department_id {
            select = select.filter(faculties::Column::DepartmentId.eq(department_id));
        }
        if let Some(term) = search_term(query.search.as_deref()) {
            select = select.filter(faculties::Column::FullName.like(contains_pattern(&term)));
        }
        let models = select
            .order_by_asc(faculties::Column::FullName)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into_faculty()).collect())
    }

    async fn update_faculty(
        &self,
        id: i64,
        req: UpdateFacultyRequest,
    ) -> Result<Option<Faculty>> {
        let Some(existing) = self.find_live::<faculties::Entity>(id, false).await? else {
            return Ok(None);
        };
        let user_id = existing.user_id;

        let txn = self.db.begin().await?;
        let mut model = faculties::ActiveModel::from(existing);
        if let Some(full_name) = &req.full_name {
            model.full_name = Set(full_name.clone());
            rename_user(&txn, user_id, full_name).await?;
        }
        if let Some(designation) = req.designation {
            model.designation = Set(Some(designation));
        }
        if let Some(department_id) = req.department_id {
            model.department_id = Set(department_id);
        }
        model.updated_at = Set(now_ts());
        let faculty = model.update(&txn).await?;
        txn.commit().await?;
        Ok(Some(faculty.into_faculty()))
    }

    async fn set_faculty_deleted(&self, id: i64, deleted: bool) -> Result<Option<Faculty>> {
        let model = self.set_deleted::<faculties::Entity>(id, deleted).await?;
        Ok(model.map(|m| m.into_faculty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, Fixture};

    #[tokio::test]
    async fn test_student_creation_is_atomic() {
        let fx = Fixture::new().await;
        let request = CreateStudentRequest {
            email: "riya@college.edu".into(),
            full_name: "Riya Shah".into(),
            enrollment_number: "22CE001".into(),
            department_id: fx.department.id,
            semester_id: fx.semester.id,
            division_id: fx.division.id,
            batch: Some("A1".into()),
        };
        let student = fx.storage.create_student(request.clone()).await.unwrap();
        let user = fx
            .storage
            .get_user_by_id(student.user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.role, UserRole::Student);

        // 学号重复时账号也不应写入
        let duplicate = CreateStudentRequest {
            email: "other@college.edu".into(),
            ..request
        };
        let err = fx.storage.create_student(duplicate).await.unwrap_err();
        assert_eq!(err.code(), "E005");
        assert!(
            fx.storage
                .get_user_by_email("other@college.edu")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_student_search() {
        let fx = Fixture::new().await;
        testing::student(&fx, "22CE001", "Aarav Patel").await;
        testing::student(&fx, "22CE002", "Diya Mehta").await;

        let found = fx
            .storage
            .list_students(StudentListQuery {
                search: Some("diya".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].enrollment_number, "22CE002");
    }

    #[tokio::test]
    async fn test_rename_updates_account() {
        let fx = Fixture::new().await;
        let student = testing::student(&fx, "22CE010", "Kabir Rao").await;

        let updated = fx
            .storage
            .update_student(
                student.id,
                UpdateStudentRequest {
                    full_name: Some("Kabir S. Rao".into()),
                    batch: Some("B2".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.full_name, "Kabir S. Rao");
        assert_eq!(updated.batch.as_deref(), Some("B2"));
        let user = fx
            .storage
            .get_user_by_id(student.user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.full_name.as_deref(), Some("Kabir S. Rao"));

        fx.storage
            .set_student_deleted(student.id, true)
            .await
            .unwrap();
        let missing = fx
            .storage
            .update_student(
                student.id,
                UpdateStudentRequest {
                    batch: Some("B3".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
