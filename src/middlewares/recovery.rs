//! 패닉 복구 단계
//!
//! 안쪽 단계나 핸들러에서 발생한 패닉을 잡아 500 응답으로 바꿉니다.
//! 패닉 메시지, 위치, 스택 트레이스는 패닉 훅이 스레드 로컬에 기록하고
//! 이 단계가 요청 로거로 남깁니다. 한 요청의 패닉은 워커나 프로세스를 멈추지 않습니다.

use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::fmt::Display;
use std::future::{ready, Ready};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::sync::Once;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage, HttpRequest, HttpResponse};
use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;

use crate::domain::models::context::RequestContext;

/// 패닉 훅이 남기는 기록
#[derive(Debug, Clone)]
pub struct PanicRecord {
    pub message: String,
    pub location: String,
    pub backtrace: String,
}

thread_local! {
    static LAST_PANIC: RefCell<Option<PanicRecord>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

/// 패닉 정보를 기록하는 훅을 한 번만 설치합니다. 기존 훅도 계속 호출됩니다.
pub fn install_panic_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let location = info
                .location()
                .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
                .unwrap_or_else(|| "unknown".to_string());
            let record = PanicRecord {
                message: payload_message(info.payload()),
                location,
                backtrace: Backtrace::force_capture().to_string(),
            };
            LAST_PANIC.with(|slot| *slot.borrow_mut() = Some(record));
            previous(info);
        }));
    });
}

/// 현재 스레드에서 마지막으로 기록된 패닉을 꺼냅니다.
pub fn take_panic_record() -> Option<PanicRecord> {
    LAST_PANIC.with(|slot| slot.borrow_mut().take())
}

fn payload_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

pub struct PanicRecovery;

impl<S, B> Transform<S, ServiceRequest> for PanicRecovery
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = PanicRecoveryService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        install_panic_hook();
        ready(Ok(PanicRecoveryService {
            service: Rc::new(service),
        }))
    }
}

pub struct PanicRecoveryService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for PanicRecoveryService<S>
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
        let http_req = req.request().clone();
        let context = req.extensions().get::<RequestContext>().cloned();
        let service = self.service.clone();

        // 핸들러 future 생성 중의 패닉
        let fut = match panic::catch_unwind(AssertUnwindSafe(|| service.call(req))) {
            Ok(fut) => fut,
            Err(payload) => {
                return Box::pin(ready(Ok(recovered(http_req, context, payload))));
            }
        };

        Box::pin(async move {
            match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(result) => result.map(|res| res.map_into_left_body()),
                Err(payload) => Ok(recovered(http_req, context, payload)),
            }
        })
    }
}

fn recovered<B>(
    http_req: HttpRequest,
    context: Option<RequestContext>,
    payload: Box<dyn std::any::Any + Send>,
) -> ServiceResponse<EitherBody<B>> {
    let record = take_panic_record().unwrap_or_else(|| PanicRecord {
        message: payload_message(payload.as_ref()),
        location: "unknown".to_string(),
        backtrace: Backtrace::force_capture().to_string(),
    });

    let context = context.unwrap_or_else(|| {
        RequestContext::detached(
            http_req.method().as_str(),
            http_req.path(),
            http_req.peer_addr().map(|addr| addr.ip().to_string()),
        )
    });
    context.logger().error("패닉 복구", &panic_log_fields(&record));

    let response = HttpResponse::InternalServerError()
        .json(serde_json::json!({ "error": "internal server error" }));
    ServiceResponse::new(http_req, response).map_into_right_body()
}

/// 복구 로그에 첨부되는 필드
fn panic_log_fields(record: &PanicRecord) -> [(&'static str, &dyn Display); 3] {
    [
        ("panic", &record.message),
        ("location", &record.location),
        ("backtrace", &record.backtrace),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App};

    async fn boom() -> HttpResponse {
        panic!("handler exploded");
    }

    async fn fine() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn test_panic_becomes_500_and_next_request_succeeds() {
        let app = test::init_service(
            App::new()
                .wrap(PanicRecovery)
                .route("/boom", web::get().to(boom))
                .route("/fine", web::get().to(fine)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/boom").to_request()).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "internal server error");

        let res = test::call_service(&app, test::TestRequest::get().uri("/fine").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    fn explode() {
        panic!("recorded {}", 42);
    }

    #[::core::prelude::v1::test]
    fn test_hook_records_message_and_location() {
        install_panic_hook();
        let _ = take_panic_record();

        let result = panic::catch_unwind(explode);
        assert!(result.is_err());

        let record = take_panic_record().unwrap();
        assert_eq!(record.message, "recorded 42");
        assert!(record.location.contains("recovery.rs"));
        assert!(!record.backtrace.is_empty());
        assert!(take_panic_record().is_none());
    }

    #[actix_web::test]
    async fn test_stage_consumes_recorded_panic() {
        let app = test::init_service(
            App::new()
                .wrap(PanicRecovery)
                .route("/boom", web::get().to(boom)),
        )
        .await;
        let _ = take_panic_record();

        let res = test::call_service(&app, test::TestRequest::get().uri("/boom").to_request()).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        // 훅이 남긴 기록(스택 트레이스 포함)은 복구 단계가 로그로 꺼내 갔다
        assert!(take_panic_record().is_none());
    }

    #[::core::prelude::v1::test]
    fn test_log_fields_carry_backtrace() {
        let record = PanicRecord {
            message: "boom".to_string(),
            location: "src/handlers/users.rs:10:5".to_string(),
            backtrace: "0: users_service::handlers::users::get_user".to_string(),
        };

        let fields: Vec<(&str, String)> = panic_log_fields(&record)
            .iter()
            .map(|(key, value)| (*key, value.to_string()))
            .collect();

        assert_eq!(
            fields,
            vec![
                ("panic", "boom".to_string()),
                ("location", "src/handlers/users.rs:10:5".to_string()),
                ("backtrace", "0: users_service::handlers::users::get_user".to_string()),
            ]
        );
    }
}
