//! 요청 컨텍스트 주입 단계
//!
//! 파이프라인의 가장 바깥 단계입니다. `X-Request-ID` 헤더가 있으면 그 값을,
//! 없으면 새 UUID를 trace id로 사용하고, 요청 메타데이터가 바인딩된
//! [`RequestContext`]를 extensions에 저장합니다. 응답에는 같은 값의
//! `x-request-id` 헤더가 붙습니다.

use std::future::{ready, Ready};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

use crate::domain::models::context::RequestContext;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub struct RequestContextStage {
    with_stack: bool,
}

impl RequestContextStage {
    /// `with_stack`이 켜져 있으면 요청 로거의 에러 로그에 스택 트레이스가 첨부됩니다.
    pub fn new(with_stack: bool) -> Self {
        Self { with_stack }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestContextStage
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestContextService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestContextService {
            service,
            with_stack: self.with_stack,
        }))
    }
}

pub struct RequestContextService<S> {
    service: S,
    with_stack: bool,
}

impl<S, B> Service<ServiceRequest> for RequestContextService<S>
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
        let trace_id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let context = RequestContext::new(
            trace_id.clone(),
            req.method().as_str(),
            req.path(),
            req.peer_addr().map(|addr| addr.ip().to_string()),
            self.with_stack,
        );
        req.extensions_mut().insert(context);

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;

            res.headers_mut().insert(
                HeaderName::from_static(REQUEST_ID_HEADER),
                HeaderValue::from_str(&trace_id)
                    .unwrap_or_else(|_| HeaderValue::from_static("invalid")),
            );

            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    async fn echo_trace(context: RequestContext) -> HttpResponse {
        HttpResponse::Ok().body(context.trace_id().to_string())
    }

    #[actix_web::test]
    async fn test_inbound_request_id_is_propagated() {
        let app = test::init_service(
            App::new()
                .wrap(RequestContextStage::new(false))
                .route("/", web::get().to(echo_trace)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(("X-Request-ID", "abc-123"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.headers().get(REQUEST_ID_HEADER).unwrap(), "abc-123");
        let body = test::read_body(res).await;
        assert_eq!(body, "abc-123");
    }

    #[actix_web::test]
    async fn test_request_id_is_generated_when_absent() {
        let app = test::init_service(
            App::new()
                .wrap(RequestContextStage::new(false))
                .route("/", web::get().to(echo_trace)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        let header = res
            .headers()
            .get(REQUEST_ID_HEADER)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(Uuid::parse_str(&header).is_ok());
        let body = test::read_body(res).await;
        assert_eq!(body, header.as_bytes());
    }
}
