//! HTTP 요청 파이프라인 단계
//!
//! 바깥에서 안쪽 순서로 적용됩니다.
//!
//! ```text
//! RequestContextStage   trace id, 요청 로거
//!  └ PanicRecovery      패닉 → 500
//!     └ AccessLog       상태 코드, 처리 시간
//!        └ Cors
//!           └ SecurityHeaders
//!              └ RateLimitStage        IP별 토큰 버킷 → 429
//!                 └ AuthMiddleware     상태 변경 라우트 스코프에만 적용
//! ```

pub mod auth_middleware;
mod auth_inner;
pub mod request_context;
pub mod recovery;
pub mod access_log;
pub mod security_headers;
pub mod rate_limiter;

use actix_cors::Cors;
use actix_web::http::header;

// 미들웨어 재export
pub use auth_middleware::AuthMiddleware;
pub use request_context::RequestContextStage;
pub use recovery::PanicRecovery;
pub use access_log::AccessLog;
pub use security_headers::SecurityHeaders;
pub use rate_limiter::RateLimitStage;

/// CORS 설정을 구성합니다
///
/// 허용 Origin 목록 외의 교차 출처 요청은 거부되며, 자격 증명(쿠키)을 허용합니다.
///
/// ```rust,ignore
/// let cors = configure_cors(&CorsConfig::allowed_origins(), CorsConfig::max_age());
/// App::new().wrap(cors)
/// ```
pub fn configure_cors(origins: &[String], max_age: usize) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .supports_credentials()
        .max_age(max_age)
}
