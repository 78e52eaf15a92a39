//! Account and profile handlers.
//!
//! ```text
//! GET    /api/users
//! POST   /api/users {"email":..,"username":..,"firstName":..,"lastName":..,"password":..}
//! GET    /api/users/me
//! GET    /api/users/{id}
//! POST   /api/users/set_password {"currentPassword":..,"newPassword":..}
//! GET    /api/users/me/avatar
//! PUT    /api/users/me/avatar {"avatar":"data:image/png;base64,..."}
//! DELETE /api/users/me/avatar
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{
    FieldErrors, ImageUpload, NewPassword, Registration, RegistrationField,
};

use super::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;
use super::user_dto::{
    AvatarPayload, RegisterRequest, RegisteredUserResponse, SetPasswordRequest, UserResponse,
};
use super::validation::parse_user_path;

fn registration_errors(failures: Vec<RegistrationField>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for failure in failures {
        match failure {
            RegistrationField::User(field, err) => errors.push(field, err),
            RegistrationField::Password(err) => errors.push("password", err),
        }
    }
    errors
}

/// All users, each with `isSubscribed` computed for the viewer.
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let viewer = session.user_id()?;
    let users = state.users.list_users(viewer.as_ref()).await?;
    Ok(web::Json(
        users
            .iter()
            .map(|profile| UserResponse::from_profile(profile, &state))
            .collect(),
    ))
}

/// Register a new account.
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let registration = Registration::try_from_parts(
        &body.email,
        &body.username,
        &body.first_name,
        &body.last_name,
        &body.password,
    )
    .map_err(|failures| registration_errors(failures).into_error("registration is invalid"))?;
    let user = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(RegisteredUserResponse::from(&user)))
}

/// The signed-in user's own profile.
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let me = session.require_user_id()?;
    let profile = state.users.get_user(Some(&me), &me).await?;
    Ok(web::Json(UserResponse::from_profile(&profile, &state)))
}

#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = parse_user_path(&path.into_inner())?;
    let viewer = session.user_id()?;
    let profile = state.users.get_user(viewer.as_ref(), &id).await?;
    Ok(web::Json(UserResponse::from_profile(&profile, &state)))
}

/// Change the caller's password after checking the current one.
#[post("/users/set_password")]
pub async fn set_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let me = session.require_user_id()?;
    let body = payload.into_inner();
    let new_password = NewPassword::new(&body.new_password)
        .map_err(|err| FieldErrors::single_error("new_password", &err.to_string()))?;
    state
        .accounts
        .set_password(&me, &body.current_password, new_password)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/users/me/avatar")]
pub async fn get_avatar(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AvatarPayload>> {
    let me = session.require_user_id()?;
    let profile = state.users.get_user(Some(&me), &me).await?;
    Ok(web::Json(AvatarPayload {
        avatar: profile.user.avatar().map(|path| state.media_url(path)),
    }))
}

/// Replace the caller's avatar with a base64 data URL image.
#[put("/users/me/avatar")]
pub async fn put_avatar(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AvatarPayload>,
) -> ApiResult<web::Json<AvatarPayload>> {
    let me = session.require_user_id()?;
    let raw = payload.into_inner().avatar.unwrap_or_default();
    let image = ImageUpload::from_data_url(&raw)
        .map_err(|err| FieldErrors::single_error("avatar", &err.to_string()))?;
    let stored = state.accounts.update_avatar(&me, image).await?;
    Ok(web::Json(AvatarPayload {
        avatar: Some(state.media_url(&stored)),
    }))
}

#[delete("/users/me/avatar")]
pub async fn delete_avatar(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let me = session.require_user_id()?;
    state.accounts.clear_avatar(&me).await?;
    Ok(HttpResponse::NoContent().finish())
}
