use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::assignments::requests::{
    AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest,
};
use crate::models::users::entities::Identity;
use crate::models::{ApiResponse, UserRole};
use crate::services::AssignmentService;
use crate::utils::{SafeIdI64, ValidatedJson, ValidatedQuery};

pub async fn list_assignments(
    service: web::Data<AssignmentService>,
    identity: Identity,
    query: ValidatedQuery<AssignmentListQuery>,
) -> ActixResult<HttpResponse> {
    let assignments = service
        .list_assignments(identity, query.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list("assignments", assignments)))
}

pub async fn create_assignment(
    service: web::Data<AssignmentService>,
    identity: Identity,
    body: ValidatedJson<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    let assignment = service
        .create_assignment(identity, body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("assignment", assignment)))
}

pub async fn get_assignment(
    service: web::Data<AssignmentService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let assignment = service.get_assignment(id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("assignment", assignment)))
}

pub async fn update_assignment(
    service: web::Data<AssignmentService>,
    identity: Identity,
    id: SafeIdI64,
    body: ValidatedJson<UpdateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    let assignment = service
        .update_assignment(identity, id.0, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("assignment", assignment)))
}

pub async fn delete_assignment(
    service: web::Data<AssignmentService>,
    identity: Identity,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    service.delete_assignment(identity, id.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

// 配置路由
pub fn configure_assignment_routes(cfg: &mut web::ServiceConfig) {
    // 只有任课教师能改动作业，归属由服务层判断
    let faculty = || RequireRole::new(&UserRole::Faculty);
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_assignments))
                    .route(web::post().to(create_assignment).wrap(faculty())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_assignment))
                    .route(web::patch().to(update_assignment).wrap(faculty()))
                    .route(web::delete().to(delete_assignment).wrap(faculty())),
            ),
    );
}
