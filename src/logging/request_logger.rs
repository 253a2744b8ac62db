//! 요청 단위로 바인딩된 로거
//!
//! 요청 컨텍스트 단계에서 trace id, 메서드, 경로, 클라이언트 주소를 묶어 생성되며,
//! 이후 모든 단계와 핸들러가 같은 필드를 가진 로그를 남길 수 있게 합니다.

use std::backtrace::Backtrace;
use std::fmt::Display;

use log::kv::Value;
use log::{Level, Record};

const TARGET: &str = "users_service::request";

/// 요청 필드가 바인딩된 로거
#[derive(Debug, Clone)]
pub struct RequestLogger {
    trace_id: String,
    method: String,
    path: String,
    client_addr: String,
    with_stack: bool,
}

impl RequestLogger {
    pub fn new(
        trace_id: impl Into<String>,
        method: impl Into<String>,
        path: impl Into<String>,
        client_addr: impl Into<String>,
        with_stack: bool,
    ) -> Self {
        Self {
            trace_id: trace_id.into(),
            method: method.into(),
            path: path.into(),
            client_addr: client_addr.into(),
            with_stack,
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn debug(&self, message: &str, fields: &[(&str, &dyn Display)]) {
        self.log(Level::Debug, message, fields);
    }

    pub fn info(&self, message: &str, fields: &[(&str, &dyn Display)]) {
        self.log(Level::Info, message, fields);
    }

    pub fn warn(&self, message: &str, fields: &[(&str, &dyn Display)]) {
        self.log(Level::Warn, message, fields);
    }

    /// 에러 로그. `LOG_WITH_STACK`이 켜져 있으면 현재 스택 트레이스를 `stack` 필드로 첨부합니다.
    pub fn error(&self, message: &str, fields: &[(&str, &dyn Display)]) {
        self.log(Level::Error, message, fields);
    }

    /// 바인딩된 필드와 호출 측 필드를 함께 담아 레코드를 출력합니다.
    pub fn log(&self, level: Level, message: &str, fields: &[(&str, &dyn Display)]) {
        if level > log::max_level() {
            return;
        }

        let stack = (level == Level::Error && self.with_stack)
            .then(|| Backtrace::force_capture().to_string());

        let mut kvs: Vec<(&str, Value<'_>)> = vec![
            ("trace_id", Value::from(self.trace_id.as_str())),
            ("method", Value::from(self.method.as_str())),
            ("path", Value::from(self.path.as_str())),
            ("client_addr", Value::from(self.client_addr.as_str())),
        ];
        for (key, value) in fields {
            kvs.push((*key, Value::from_dyn_display(*value)));
        }
        if let Some(stack) = stack.as_deref() {
            kvs.push(("stack", Value::from(stack)));
        }

        log::logger().log(
            &Record::builder()
                .level(level)
                .target(TARGET)
                .args(format_args!("{}", message))
                .key_values(&kvs)
                .build(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_keeps_trace_id() {
        let logger = RequestLogger::new("trace-1", "GET", "/users", "127.0.0.1", false);
        assert_eq!(logger.trace_id(), "trace-1");

        // 전역 로거가 없어도 패닉 없이 동작해야 함
        logger.info("hello", &[("status", &200)]);
        logger.error("boom", &[]);
    }
}
