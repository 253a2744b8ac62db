//! 요청 단위 접근 로그
//!
//! 안쪽 단계가 결정한 최종 상태 코드와 처리 시간을 요청 로거로 남깁니다.
//! 5xx는 error, 4xx는 warn, 그 외는 info 레벨입니다.

use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use log::Level;

use crate::domain::models::context::RequestContext;

pub struct AccessLog;

impl<S, B> Transform<S, ServiceRequest> for AccessLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessLogService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessLogService { service }))
    }
}

pub struct AccessLogService<S> {
    service: S,
}

/// 상태 코드에 해당하는 로그 레벨
pub fn level_for(status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::Error
    } else if status.is_client_error() {
        Level::Warn
    } else {
        Level::Info
    }
}

impl<S, B> Service<ServiceRequest> for AccessLogService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let context = req
            .extensions()
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_else(|| {
                RequestContext::detached(
                    req.method().as_str(),
                    req.path(),
                    req.peer_addr().map(|addr| addr.ip().to_string()),
                )
            });

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            let status = match &result {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            let duration_ms = start.elapsed().as_millis();

            context.logger().log(
                level_for(status),
                "요청 처리 완료",
                &[("status", &status.as_u16()), ("duration_ms", &duration_ms)],
            );

            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    #[::core::prelude::v1::test]
    fn test_level_for_status() {
        assert_eq!(level_for(StatusCode::OK), Level::Info);
        assert_eq!(level_for(StatusCode::NO_CONTENT), Level::Info);
        assert_eq!(level_for(StatusCode::NOT_FOUND), Level::Warn);
        assert_eq!(level_for(StatusCode::TOO_MANY_REQUESTS), Level::Warn);
        assert_eq!(level_for(StatusCode::INTERNAL_SERVER_ERROR), Level::Error);
    }

    #[actix_web::test]
    async fn test_response_passes_through_unchanged() {
        let app = test::init_service(
            App::new()
                .wrap(AccessLog)
                .route("/", web::get().to(|| async { HttpResponse::Created().body("made") })),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(test::read_body(res).await, "made");
    }
}
