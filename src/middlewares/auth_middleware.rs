//! JWT 인증/인가 미들웨어
//!
//! `Authorization: Bearer <token>` 헤더를 검증하고, 성공하면 주체 ID와 역할을 담은
//! 새 [`RequestContext`](crate::domain::models::context::RequestContext)를 request
//! extensions에 저장합니다. 상태를 바꾸는 라우트 스코프에만 적용됩니다.
//!
//! | 상황 | 응답 |
//! |------|------|
//! | 헤더 없음, Bearer 형식 아님 | 401 |
//! | 서명 불일치, 만료, `sub` 해석 불가 | 401 |
//! | 역할 불일치 | 403 |
//!
//! ```rust,ignore
//! web::scope("/users")
//!     .wrap(AuthMiddleware::required_with_role("admin"))
//!     .service(create_user)
//! ```

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
};

use crate::middlewares::auth_inner::AuthMiddlewareService;

/// 인증 단계. `required_role`이 있으면 토큰의 역할이 정확히 일치해야 합니다.
pub struct AuthMiddleware {
    required_role: Option<String>,
}

impl AuthMiddleware {
    /// 유효한 토큰만 요구 (역할 무관)
    pub fn required() -> Self {
        Self { required_role: None }
    }

    /// 유효한 토큰과 특정 역할을 요구
    pub fn required_with_role(role: &str) -> Self {
        Self {
            required_role: Some(role.to_string()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            required_role: self.required_role.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};
    use chrono::{Duration, Utc};

    use crate::domain::models::auth::AuthenticatedUser;
    use crate::domain::models::token::TokenClaims;
    use crate::services::auth::TokenService;

    fn token_service() -> TokenService {
        TokenService::new("middleware-secret", Duration::minutes(15), Duration::hours(1))
    }

    fn token(service: &TokenService, sub: i64, role: &str, exp_offset: Duration) -> String {
        service
            .sign_claims(&TokenClaims {
                sub,
                email: "lev@x.com".to_string(),
                role: role.to_string(),
                exp: (Utc::now() + exp_offset).timestamp(),
            })
            .unwrap()
    }

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({
            "id": user.user_id,
            "role": user.role,
        }))
    }

    macro_rules! app {
        ($middleware:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(token_service()))
                    .service(
                        web::scope("/guarded")
                            .wrap($middleware)
                            .route("", web::get().to(whoami)),
                    ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_valid_token_attaches_identity() {
        let app = app!(AuthMiddleware::required_with_role("admin"));
        let token = token(&token_service(), 42, "admin", Duration::minutes(5));

        let req = test::TestRequest::get()
            .uri("/guarded")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["id"], 42);
        assert_eq!(body["role"], "admin");
    }

    #[actix_web::test]
    async fn test_missing_or_malformed_header_is_unauthorized() {
        let app = app!(AuthMiddleware::required());

        let req = test::TestRequest::get().uri("/guarded").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/guarded")
            .insert_header(("Authorization", "Token abc"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_expired_and_foreign_tokens_are_unauthorized() {
        let app = app!(AuthMiddleware::required());
        let expired = token(&token_service(), 42, "admin", -Duration::minutes(1));
        let foreign_service =
            TokenService::new("someone-else", Duration::minutes(15), Duration::hours(1));
        let foreign = token(&foreign_service, 42, "admin", Duration::minutes(5));

        for token in [expired, foreign] {
            let req = test::TestRequest::get()
                .uri("/guarded")
                .insert_header(("Authorization", format!("Bearer {}", token)))
                .to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

            let body: serde_json::Value = test::read_body_json(res).await;
            assert!(body["error"].is_string());
        }
    }

    #[actix_web::test]
    async fn test_wrong_role_is_forbidden() {
        let app = app!(AuthMiddleware::required_with_role("admin"));
        let token = token(&token_service(), 7, "user", Duration::minutes(5));

        let req = test::TestRequest::get()
            .uri("/guarded")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_required_without_role_accepts_any_role() {
        let app = app!(AuthMiddleware::required());
        let token = token(&token_service(), 9, "user", Duration::minutes(5));

        let req = test::TestRequest::get()
            .uri("/guarded")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["id"], 9);
        assert_eq!(body["role"], "user");
    }

    #[actix_web::test]
    async fn test_role_gate_is_exact_match() {
        let app = app!(AuthMiddleware::required_with_role("admin"));

        for role in ["Admin", "administrator", ""] {
            let token = token(&token_service(), 7, role, Duration::minutes(5));
            let req = test::TestRequest::get()
                .uri("/guarded")
                .insert_header(("Authorization", format!("Bearer {}", token)))
                .to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::FORBIDDEN, "role {:?}", role);
        }
    }
}
