//! 라우트 구성
//!
//! | 경로 | 인증 |
//! |------|------|
//! | `GET /ready`, `POST /register`, `POST /login` | 없음 |
//! | `GET /users`, `GET /users/{id}` | 없음 |
//! | `GET /me` | 유효한 토큰 |
//! | `POST /users`, `PUT/PATCH/DELETE /users/{id}` | 토큰 + `admin` 역할 |
//!
//! 상태 변경 메서드만 통과시키는 guard를 가진 `/users` 스코프가 먼저 등록되고,
//! 조회 요청은 guard에 걸러져 뒤의 공개 라우트로 전달됩니다.

use actix_web::{guard, web};

use crate::domain::entities::users::ADMIN_ROLE;
use crate::handlers;
use crate::middlewares::AuthMiddleware;

pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::health::ready);

    configure_auth_routes(cfg);
    configure_user_routes(cfg);
}

fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::auth::register)
        .service(handlers::auth::login);
}

fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/me")
            .wrap(AuthMiddleware::required())
            .service(handlers::users::me),
    );

    cfg.service(
        web::scope("/users")
            .guard(
                guard::Any(guard::Post())
                    .or(guard::Put())
                    .or(guard::Patch())
                    .or(guard::Delete()),
            )
            .wrap(AuthMiddleware::required_with_role(ADMIN_ROLE))
            .service(handlers::users::create_user)
            .service(handlers::users::replace_user)
            .service(handlers::users::patch_user)
            .service(handlers::users::delete_user),
    );

    cfg.service(handlers::users::list_users)
        .service(handlers::users::get_user);
}
