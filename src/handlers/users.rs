//! User Management HTTP Handlers
//!
//! 사용자 조회/생성/수정/삭제 엔드포인트입니다.
//!
//! | 핸들러 | 경로 | 인증 |
//! |--------|------|------|
//! | [`list_users`] | `GET /users` | 없음 |
//! | [`get_user`] | `GET /users/{id}` | 없음 |
//! | [`me`] | `GET /me` | 유효한 토큰 |
//! | [`create_user`] | `POST /users` | `admin` |
//! | [`replace_user`] | `PUT /users/{id}` | `admin` |
//! | [`patch_user`] | `PATCH /users/{id}` | `admin` |
//! | [`delete_user`] | `DELETE /users/{id}` | `admin` |
//!
//! 보호 라우트는 `/users` 스코프에 인증 미들웨어를 씌워 등록되므로
//! 상태 변경 핸들러의 경로는 스코프 기준 상대 경로입니다.

use actix_web::{delete, get, patch, post, put, web, HttpResponse};

use crate::domain::dto::users::request::{CreateUserRequest, PatchUserRequest, ReplaceUserRequest};
use crate::domain::models::auth::AuthenticatedUser;
use crate::domain::models::context::RequestContext;
use crate::errors::AppError;
use crate::services::UserService;

/// 경로의 사용자 ID를 정수로 해석합니다.
pub fn parse_user_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::ValidationError(format!("invalid user id: {}", raw)))
}

#[get("/users")]
pub async fn list_users(user_service: web::Data<UserService>) -> Result<HttpResponse, AppError> {
    let users = user_service.list().await?;
    Ok(HttpResponse::Ok().json(users))
}

#[get("/users/{user_id}")]
pub async fn get_user(
    user_service: web::Data<UserService>,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_user_id(&user_id)?;
    let user = user_service.get(id).await?;

    Ok(HttpResponse::Ok().json(user))
}

/// 인증된 사용자 본인의 정보
#[get("")]
pub async fn me(
    user_service: web::Data<UserService>,
    current: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = user_service.me(current.user_id).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[post("")]
pub async fn create_user(
    context: RequestContext,
    user_service: web::Data<UserService>,
    payload: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let user = user_service.create(payload.into_inner()).await?;

    context.logger().info(
        "관리자 사용자 생성",
        &[
            ("user_id", &user.id),
            ("admin_id", &context.subject_id().unwrap_or_default()),
        ],
    );
    Ok(HttpResponse::Created().json(user))
}

#[put("/{user_id}")]
pub async fn replace_user(
    user_service: web::Data<UserService>,
    user_id: web::Path<String>,
    payload: web::Json<ReplaceUserRequest>,
) -> Result<HttpResponse, AppError> {
    let id = parse_user_id(&user_id)?;
    let user = user_service.replace(id, payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(user))
}

#[patch("/{user_id}")]
pub async fn patch_user(
    user_service: web::Data<UserService>,
    user_id: web::Path<String>,
    payload: web::Json<PatchUserRequest>,
) -> Result<HttpResponse, AppError> {
    let id = parse_user_id(&user_id)?;
    let user = user_service.patch(id, payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(user))
}

#[delete("/{user_id}")]
pub async fn delete_user(
    context: RequestContext,
    user_service: web::Data<UserService>,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_user_id(&user_id)?;
    user_service.delete(id).await?;

    context.logger().info("사용자 삭제", &[("user_id", &id)]);
    Ok(HttpResponse::NoContent().finish())
}
