//! Authentication HTTP Handlers
//!
//! 회원가입과 로컬 로그인 엔드포인트입니다.
//!
//! - `POST /register` - 사용자 생성 (기본 역할)
//! - `POST /login` - 이메일/패스워드 검증 후 토큰 발급
use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{post, web, HttpResponse};

use crate::domain::dto::users::request::{LoginRequest, RegisterRequest};
use crate::domain::dto::users::response::LoginResponse;
use crate::domain::models::context::RequestContext;
use crate::errors::AppError;
use crate::services::{TokenService, UserService};

pub const REFRESH_TOKEN_COOKIE: &str = "refresh-token";

/// 회원가입 핸들러
///
/// # Endpoint
/// `POST /register` → 201, 생성된 사용자 (비밀번호 해시 제외)
#[post("/register")]
pub async fn register(
    context: RequestContext,
    user_service: web::Data<UserService>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let user = user_service.register(payload.into_inner()).await?;

    context.logger().info(
        "사용자 등록 완료",
        &[("user_id", &user.id), ("email", &user.email)],
    );
    Ok(HttpResponse::Created().json(user))
}

/// 로컬 로그인 핸들러
///
/// 액세스 토큰은 본문(`access-token`)으로, 리프레시 토큰은
/// `HttpOnly; SameSite=Strict` 쿠키로 전달합니다.
///
/// # Endpoint
/// `POST /login`
#[post("/login")]
pub async fn login(
    context: RequestContext,
    user_service: web::Data<UserService>,
    token_service: web::Data<TokenService>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let user = user_service.authenticate(payload.into_inner()).await?;

    let token_pair = token_service.generate_token_pair(&user).map_err(|e| {
        context.logger().error("토큰 생성 실패", &[("user_id", &user.id)]);
        e
    })?;

    let cookie = Cookie::build(REFRESH_TOKEN_COOKIE, token_pair.refresh_token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(CookieDuration::seconds(
            token_service.refresh_ttl().num_seconds(),
        ))
        .finish();

    context.logger().info("로그인 성공", &[("user_id", &user.id)]);

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(LoginResponse::new(token_pair.access_token)))
}
