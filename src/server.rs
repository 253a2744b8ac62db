//! 애플리케이션 조립
//!
//! 서비스, 레이트 리미터, CORS 설정을 묶은 [`AppState`]로부터 고정된 순서의
//! 파이프라인을 가진 `App`을 만듭니다. `main`과 HTTP 통합 테스트가 같은 빌더를 사용합니다.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App};

use crate::config::CorsConfig;
use crate::errors::AppError;
use crate::middlewares::{
    configure_cors, AccessLog, PanicRecovery, RateLimitStage, RequestContextStage,
    SecurityHeaders,
};
use crate::rate_limit::RateLimiterRegistry;
use crate::services::{TokenService, UserService};

/// 워커 간에 공유되는 애플리케이션 상태
#[derive(Clone)]
pub struct AppState {
    pub user_service: web::Data<UserService>,
    pub token_service: web::Data<TokenService>,
    pub rate_limiter: Arc<RateLimiterRegistry>,
    pub cors_origins: Vec<String>,
    pub log_with_stack: bool,
}

impl AppState {
    pub fn new(
        user_service: UserService,
        token_service: TokenService,
        rate_limiter: Arc<RateLimiterRegistry>,
    ) -> Self {
        Self {
            user_service: web::Data::new(user_service),
            token_service: web::Data::new(token_service),
            rate_limiter,
            cors_origins: CorsConfig::allowed_origins(),
            log_with_stack: false,
        }
    }

    pub fn with_stack(mut self, enabled: bool) -> Self {
        self.log_with_stack = enabled;
        self
    }
}

/// 파이프라인이 적용된 App을 만듭니다.
///
/// `.wrap()`은 나중에 호출한 것이 바깥에 위치하므로 호출 순서는 안쪽부터입니다.
///
/// ```rust,ignore
/// HttpServer::new(move || build_app(state.clone(), configure_all_routes))
/// ```
pub fn build_app<F>(
    state: AppState,
    routes: F,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    F: FnOnce(&mut web::ServiceConfig),
{
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into());

    App::new()
        .app_data(json_config)
        .app_data(state.user_service)
        .app_data(state.token_service)
        .configure(routes)
        .wrap(RateLimitStage::new(state.rate_limiter))
        .wrap(SecurityHeaders)
        .wrap(configure_cors(&state.cors_origins, CorsConfig::max_age()))
        .wrap(AccessLog)
        .wrap(PanicRecovery)
        .wrap(RequestContextStage::new(state.log_with_stack))
}
