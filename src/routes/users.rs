use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::faculty::requests::{
    CreateFacultyRequest, FacultyListQuery, UpdateFacultyRequest,
};
use crate::models::students::requests::{
    CreateStudentRequest, StudentListQuery, UpdateStudentRequest,
};
use crate::models::users::{entities::Identity, requests::CreateUserRequest};
use crate::models::{ApiResponse, UserRole};
use crate::services::UserService;
use crate::utils::{SafeIdI64, ValidatedJson, ValidatedQuery};

pub async fn create_user(
    service: web::Data<UserService>,
    body: ValidatedJson<CreateUserRequest>,
) -> ActixResult<HttpResponse> {
    let user = service.create_user(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("user", user)))
}

pub async fn current_user(
    service: web::Data<UserService>,
    identity: Identity,
) -> ActixResult<HttpResponse> {
    let user = service.current_user(identity).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("user", user)))
}

pub async fn delete_user(
    service: web::Data<UserService>,
    identity: Identity,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    service.delete_user(identity, id.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn create_student(
    service: web::Data<UserService>,
    body: ValidatedJson<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    let student = service.create_student(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("student", student)))
}

pub async fn list_students(
    service: web::Data<UserService>,
    query: ValidatedQuery<StudentListQuery>,
) -> ActixResult<HttpResponse> {
    let students = service.list_students(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list("students", students)))
}

pub async fn get_student(
    service: web::Data<UserService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let student = service.get_student(id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("student", student)))
}

pub async fn update_student(
    service: web::Data<UserService>,
    id: SafeIdI64,
    body: ValidatedJson<UpdateStudentRequest>,
) -> ActixResult<HttpResponse> {
    let student = service.update_student(id.0, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("student", student)))
}

pub async fn delete_student(
    service: web::Data<UserService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    service.delete_student(id.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn restore_student(
    service: web::Data<UserService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let student = service.restore_student(id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("student", student)))
}

pub async fn create_faculty(
    service: web::Data<UserService>,
    body: ValidatedJson<CreateFacultyRequest>,
) -> ActixResult<HttpResponse> {
    let faculty = service.create_faculty(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("faculty", faculty)))
}

pub async fn list_faculty(
    service: web::Data<UserService>,
    query: ValidatedQuery<FacultyListQuery>,
) -> ActixResult<HttpResponse> {
    let faculties = service.list_faculty(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list("faculties", faculties)))
}

pub async fn get_faculty(
    service: web::Data<UserService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let faculty = service.get_faculty(id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("faculty", faculty)))
}

pub async fn update_faculty(
    service: web::Data<UserService>,
    id: SafeIdI64,
    body: ValidatedJson<UpdateFacultyRequest>,
) -> ActixResult<HttpResponse> {
    let faculty = service.update_faculty(id.0, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("faculty", faculty)))
}

pub async fn delete_faculty(
    service: web::Data<UserService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    service.delete_faculty(id.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn restore_faculty(
    service: web::Data<UserService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let faculty = service.restore_faculty(id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("faculty", faculty)))
}

// 配置路由
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    let admin = || RequireRole::new(&UserRole::Admin);
    let staff = || RequireRole::new_any(UserRole::staff_roles());

    cfg.service(
        web::scope("/api/v1/users")
            .wrap(RequireJWT)
            .route("", web::post().to(create_user).wrap(admin()))
            // 任何已登录用户都可以查看自己的账号与档案
            .route("/me", web::get().to(current_user))
            .route("/{id}", web::delete().to(delete_user).wrap(admin())),
    )
    .service(
        web::scope("/api/v1/students")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_students).wrap(staff()))
                    .route(web::post().to(create_student).wrap(admin())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_student).wrap(staff()))
                    .route(web::patch().to(update_student).wrap(admin()))
                    .route(web::delete().to(delete_student).wrap(admin())),
            )
            .route("/{id}/restore", web::patch().to(restore_student).wrap(admin())),
    )
    .service(
        web::scope("/api/v1/faculty")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_faculty))
                    .route(web::post().to(create_faculty).wrap(admin())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_faculty))
                    .route(web::patch().to(update_faculty).wrap(admin()))
                    .route(web::delete().to(delete_faculty).wrap(admin())),
            )
            .route("/{id}/restore", web::patch().to(restore_faculty).wrap(admin())),
    );
}
