//! 요청 단위 컨텍스트
//!
//! 파이프라인의 가장 바깥 단계에서 만들어져 request extensions에 저장됩니다.
//! 값은 불변이며, 인증 단계처럼 정보를 추가하는 단계는 `with_identity`로
//! 새 값을 만들어 다시 저장합니다.

use std::future::{ready, Ready};

use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use uuid::Uuid;

use crate::errors::AppError;
use crate::logging::RequestLogger;

#[derive(Debug, Clone)]
pub struct RequestContext {
    trace_id: String,
    logger: RequestLogger,
    client_addr: Option<String>,
    subject_id: Option<i64>,
    role: Option<String>,
}

impl RequestContext {
    /// 새 요청 컨텍스트를 생성합니다. 로거는 전달된 필드로 바인딩됩니다.
    pub fn new(
        trace_id: String,
        method: &str,
        path: &str,
        client_addr: Option<String>,
        with_stack: bool,
    ) -> Self {
        let logger = RequestLogger::new(
            trace_id.clone(),
            method,
            path,
            client_addr.clone().unwrap_or_else(|| "-".to_string()),
            with_stack,
        );

        Self {
            trace_id,
            logger,
            client_addr,
            subject_id: None,
            role: None,
        }
    }

    /// 컨텍스트 단계를 거치지 않은 요청용 컨텍스트 (새 trace id 생성)
    pub fn detached(method: &str, path: &str, client_addr: Option<String>) -> Self {
        Self::new(Uuid::new_v4().to_string(), method, path, client_addr, false)
    }

    /// 인증된 주체 정보가 추가된 새 컨텍스트
    pub fn with_identity(&self, subject_id: i64, role: Option<String>) -> Self {
        Self {
            subject_id: Some(subject_id),
            role,
            ..self.clone()
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn logger(&self) -> &RequestLogger {
        &self.logger
    }

    pub fn client_addr(&self) -> Option<&str> {
        self.client_addr.as_deref()
    }

    pub fn subject_id(&self) -> Option<i64> {
        self.subject_id
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }
}

impl FromRequest for RequestContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<RequestContext>() {
            Some(context) => ready(Ok(context.clone())),
            None => ready(Err(AppError::InternalError(
                "요청 컨텍스트가 설정되지 않았습니다".to_string(),
            )
            .into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_identity_returns_new_value() {
        let base = RequestContext::new(
            "trace-1".to_string(),
            "GET",
            "/me",
            Some("127.0.0.1".to_string()),
            false,
        );
        let authed = base.with_identity(42, Some("admin".to_string()));

        assert_eq!(base.subject_id(), None);
        assert_eq!(base.role(), None);
        assert_eq!(authed.subject_id(), Some(42));
        assert_eq!(authed.role(), Some("admin"));
        assert_eq!(authed.trace_id(), "trace-1");
        assert_eq!(authed.client_addr(), Some("127.0.0.1"));
        assert_eq!(authed.logger().trace_id(), "trace-1");
    }

    #[test]
    fn test_detached_context_generates_trace_id() {
        let a = RequestContext::detached("GET", "/", None);
        let b = RequestContext::detached("GET", "/", None);

        assert!(Uuid::parse_str(a.trace_id()).is_ok());
        assert_ne!(a.trace_id(), b.trace_id());
    }
}
