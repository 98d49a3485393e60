use tracing::info;

use super::{EMAIL_TAKEN, USER_NOT_FOUND, UserService};
use crate::errors::{Result, TrackademyError};
use crate::middlewares::require_jwt::identity_cache_key;
use crate::models::users::{
    entities::{Identity, User},
    requests::CreateUserRequest,
    responses::CurrentUserResponse,
};

pub async fn create_user(service: &UserService, req: CreateUserRequest) -> Result<User> {
    let storage = service.storage();
    if storage.get_user_by_email(&req.email).await?.is_some() {
        return Err(TrackademyError::conflict(EMAIL_TAKEN));
    }

    let user = storage.create_user(req).await?;
    info!("User {} created with role {}", user.email, user.role);
    Ok(user)
}

pub async fn current_user(service: &UserService, identity: Identity) -> Result<CurrentUserResponse> {
    let storage = service.storage();
    let user = storage
        .get_user_by_id(identity.user_id)
        .await?
        .filter(|u| !u.is_deleted)
        .ok_or_else(|| TrackademyError::not_found(USER_NOT_FOUND))?;

    let student = if identity.is_student() {
        storage.get_student_by_user_id(user.id).await?
    } else {
        None
    };
    let faculty = if identity.is_faculty() {
        storage.get_faculty_by_user_id(user.id).await?
    } else {
        None
    };

    Ok(CurrentUserResponse {
        user,
        student,
        faculty,
    })
}

pub async fn delete_user(service: &UserService, identity: Identity, user_id: i64) -> Result<()> {
    if identity.user_id == user_id {
        return Err(TrackademyError::bad_request(
            "You cannot delete your own account.",
        ));
    }

    service
        .storage()
        .set_user_deleted(user_id, true)
        .await?
        .ok_or_else(|| TrackademyError::not_found(USER_NOT_FOUND))?;

    // 已签发的令牌随即失效
    service.cache().remove(&identity_cache_key(user_id)).await;
    info!("User {} deleted by {}", user_id, identity.user_id);
    Ok(())
}
