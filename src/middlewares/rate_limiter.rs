//! IP별 레이트 리밋 단계
//!
//! 요청의 원격 주소(포트 제외)를 클라이언트 식별자로 사용하여
//! [`RateLimiterRegistry`]에 토큰을 요청합니다. 토큰이 없으면 429,
//! 원격 주소를 알 수 없으면 리미터를 건너뛰지 않고 500으로 응답합니다.

use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage, HttpResponse, ResponseError};
use futures_util::future::LocalBoxFuture;

use crate::domain::models::context::RequestContext;
use crate::errors::AppError;
use crate::rate_limit::RateLimiterRegistry;

pub struct RateLimitStage {
    registry: Arc<RateLimiterRegistry>,
}

impl RateLimitStage {
    pub fn new(registry: Arc<RateLimiterRegistry>) -> Self {
        Self { registry }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitStage
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitService {
            service: Rc::new(service),
            registry: self.registry.clone(),
        }))
    }
}

pub struct RateLimitService<S> {
    service: Rc<S>,
    registry: Arc<RateLimiterRegistry>,
}

impl<S, B> Service<ServiceRequest> for RateLimitService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let registry = self.registry.clone();

        Box::pin(async move {
            let Some(identity) = req.peer_addr().map(|addr| addr.ip().to_string()) else {
                log_with_context(&req, "클라이언트 주소를 확인할 수 없습니다");
                let response = AppError::InternalError(
                    "client address unavailable".to_string(),
                )
                .error_response();
                return Ok(short_circuit(req, response));
            };

            if !registry.allow(&identity) {
                log_with_context(&req, "요청 한도 초과");
                let response = HttpResponse::TooManyRequests()
                    .json(serde_json::json!({ "error": "too many requests" }));
                return Ok(short_circuit(req, response));
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

fn log_with_context(req: &ServiceRequest, message: &str) {
    match req.extensions().get::<RequestContext>() {
        Some(context) => context.logger().warn(message, &[]),
        None => log::warn!("{} ({} {})", message, req.method(), req.path()),
    }
}

fn short_circuit<B>(req: ServiceRequest, response: HttpResponse) -> ServiceResponse<EitherBody<B>> {
    let (req, _) = req.into_parts();
    ServiceResponse::new(req, response).map_into_right_body()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App};

    use crate::config::RateLimitConfig;

    fn registry(burst_size: u32) -> Arc<RateLimiterRegistry> {
        Arc::new(
            RateLimiterRegistry::new(RateLimitConfig {
                per_second: 0.01,
                burst_size,
                ..RateLimitConfig::default()
            })
            .unwrap(),
        )
    }

    fn from(ip: &str) -> test::TestRequest {
        test::TestRequest::get()
            .uri("/")
            .peer_addr(format!("{}:40000", ip).parse().unwrap())
    }

    #[actix_web::test]
    async fn test_burst_then_too_many_requests() {
        let app = test::init_service(
            App::new()
                .wrap(RateLimitStage::new(registry(3)))
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        for _ in 0..3 {
            let res = test::call_service(&app, from("10.0.0.1").to_request()).await;
            assert_eq!(res.status(), StatusCode::OK);
        }

        let res = test::call_service(&app, from("10.0.0.1").to_request()).await;
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "too many requests");

        // 다른 클라이언트는 영향을 받지 않음
        let res = test::call_service(&app, from("10.0.0.2").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_ports_share_one_identity() {
        let registry = registry(1);
        let app = test::init_service(
            App::new()
                .wrap(RateLimitStage::new(registry.clone()))
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let res = test::call_service(&app, from("10.0.0.3").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/")
            .peer_addr("10.0.0.3:50001".parse().unwrap())
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(registry.len(), 1);
    }

    #[actix_web::test]
    async fn test_missing_peer_address_is_server_error() {
        let app = test::init_service(
            App::new()
                .wrap(RateLimitStage::new(registry(3)))
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
