use actix_multipart::Multipart;
use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::submissions::requests::{
    CreateSubmissionRequest, GradeSubmissionRequest, SubmissionListQuery,
    UpdateSubmissionRequest,
};
use crate::models::users::entities::Identity;
use crate::models::{ApiResponse, UserRole};
use crate::services::SubmissionService;
use crate::services::uploads::read_upload_form;
use crate::utils::{SafeIdI64, ValidatedJson, ValidatedQuery};

const FILE_FIELD: &str = "file";

pub async fn list_submissions(
    service: web::Data<SubmissionService>,
    identity: Identity,
    query: ValidatedQuery<SubmissionListQuery>,
) -> ActixResult<HttpResponse> {
    let submissions = service
        .list_submissions(identity, query.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list("submissions", submissions)))
}

pub async fn create_submission(
    service: web::Data<SubmissionService>,
    identity: Identity,
    body: ValidatedJson<CreateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    let submission = service
        .create_submission(identity, body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("submission", submission)))
}

pub async fn upload_submission(
    service: web::Data<SubmissionService>,
    identity: Identity,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let form = read_upload_form(payload, FILE_FIELD).await?;
    let submission = service.create_submission_upload(identity, form).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("submission", submission)))
}

pub async fn assignment_submissions(
    service: web::Data<SubmissionService>,
    identity: Identity,
    id: SafeIdI64,
    query: ValidatedQuery<SubmissionListQuery>,
) -> ActixResult<HttpResponse> {
    let submissions = service
        .assignment_submissions(identity, id.0, query.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list("submissions", submissions)))
}

pub async fn assignment_statistics(
    service: web::Data<SubmissionService>,
    identity: Identity,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let statistics = service.assignment_statistics(identity, id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("statistics", statistics)))
}

pub async fn get_submission(
    service: web::Data<SubmissionService>,
    identity: Identity,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let submission = service.get_submission(identity, id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("submission", submission)))
}

pub async fn update_submission(
    service: web::Data<SubmissionService>,
    identity: Identity,
    id: SafeIdI64,
    body: ValidatedJson<UpdateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    let submission = service
        .update_submission(identity, id.0, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("submission", submission)))
}

pub async fn delete_submission(
    service: web::Data<SubmissionService>,
    identity: Identity,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    service.delete_submission(identity, id.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn grade_submission(
    service: web::Data<SubmissionService>,
    identity: Identity,
    id: SafeIdI64,
    body: ValidatedJson<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    let submission = service
        .grade_submission(identity, id.0, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("submission", submission)))
}

// 配置路由
pub fn configure_submission_routes(cfg: &mut web::ServiceConfig) {
    let student = || RequireRole::new(&UserRole::Student);
    let staff = || RequireRole::new_any(UserRole::staff_roles());
    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_submissions))
                    .route(web::post().to(create_submission).wrap(student())),
            )
            .route("/upload", web::post().to(upload_submission).wrap(student()))
            .route(
                "/assignment/{id}",
                web::get().to(assignment_submissions).wrap(staff()),
            )
            .route(
                "/assignment/{id}/statistics",
                web::get().to(assignment_statistics).wrap(staff()),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_submission))
                    .route(web::put().to(update_submission).wrap(student()))
                    .route(web::delete().to(delete_submission).wrap(student())),
            )
            .route("/{id}/grade", web::post().to(grade_submission).wrap(staff())),
    );
}
