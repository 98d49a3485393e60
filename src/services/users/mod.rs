pub mod accounts;
pub mod faculty;
pub mod students;

use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::errors::Result;
use crate::models::{
    faculty::{
        entities::Faculty,
        requests::{CreateFacultyRequest, FacultyListQuery, UpdateFacultyRequest},
    },
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
    },
    users::{
        entities::{Identity, User},
        requests::CreateUserRequest,
        responses::CurrentUserResponse,
    },
};
use crate::storage::Storage;

pub const USER_NOT_FOUND: &str = "User not found.";
pub const EMAIL_TAKEN: &str = "A user with this email already exists.";

/// 账号与学生、教师档案
pub struct UserService {
    storage: Arc<dyn Storage>,
    // 删除账号时清掉 JWT 中间件缓存的身份
    cache: Arc<dyn ObjectCache>,
}

impl UserService {
    pub fn new(storage: Arc<dyn Storage>, cache: Arc<dyn ObjectCache>) -> Self {
        Self { storage, cache }
    }

    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub(crate) fn cache(&self) -> &dyn ObjectCache {
        self.cache.as_ref()
    }

    pub async fn create_user(&self, req: CreateUserRequest) -> Result<User> {
        accounts::create_user(self, req).await
    }

    // 当前登录用户及其档案
    pub async fn current_user(&self, identity: Identity) -> Result<CurrentUserResponse> {
        accounts::current_user(self, identity).await
    }

    pub async fn delete_user(&self, identity: Identity, user_id: i64) -> Result<()> {
        accounts::delete_user(self, identity, user_id).await
    }

    pub async fn create_student(&self, req: CreateStudentRequest) -> Result<Student> {
        students::create_student(self, req).await
    }

    pub async fn list_students(&self, query: StudentListQuery) -> Result<Vec<Student>> {
        self.storage().list_students(query).await
    }

    pub async fn get_student(&self, id: i64) -> Result<Student> {
        students::get_student(self, id).await
    }

    pub async fn update_student(&self, id: i64, req: UpdateStudentRequest) -> Result<Student> {
        students::update_student(self, id, req).await
    }

    pub async fn delete_student(&self, id: i64) -> Result<()> {
        students::delete_student(self, id).await
    }

    pub async fn restore_student(&self, id: i64) -> Result<Student> {
        students::restore_student(self, id).await
    }

    pub async fn create_faculty(&self, req: CreateFacultyRequest) -> Result<Faculty> {
        faculty::create_faculty(self, req).await
    }

    pub async fn list_faculty(&self, query: FacultyListQuery) -> Result<Vec<Faculty>> {
        self.storage().list_faculty(query).await
    }

    pub async fn get_faculty(&self, id: i64) -> Result<Faculty> {
        faculty::get_faculty(self, id).await
    }

    pub async fn update_faculty(&self, id: i64, req: UpdateFacultyRequest) -> Result<Faculty> {
        faculty::update_faculty(self, id, req).await
    }

    pub async fn delete_faculty(&self, id: i64) -> Result<()> {
        faculty::delete_faculty(self, id).await
    }

    pub async fn restore_faculty(&self, id: i64) -> Result<Faculty> {
        faculty::restore_faculty(self, id).await
    }
}
