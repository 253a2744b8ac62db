//! 로깅 시스템 초기화 모듈
//!
//! `log` 파사드와 `env_logger` 백엔드를 사용합니다.
//! 개발 환경에서는 사람이 읽기 쉬운 한 줄 형식으로, 그 외 환경에서는
//! 한 줄에 하나의 JSON 객체로 출력합니다. 레코드에 첨부된
//! key/value (`log` 의 `kv` 기능)는 두 형식 모두에서 함께 출력됩니다.
//!
//! # Environment Variables
//!
//! * `APP_ENV` - `dev`이면 콘솔 형식, 그 외 JSON 형식
//! * `LOG_LEVEL` - debug, info, warn, error (기본값: info)
//! * `LOG_WITH_STACK` - 에러 로그에 스택 트레이스 첨부 여부
//! * `RUST_LOG` - 설정된 경우 모듈별 필터가 우선 적용됨
//!
//! # Examples
//!
//! ```bash
//! APP_ENV=dev LOG_LEVEL=debug cargo run
//! ```

pub mod request_logger;

pub use request_logger::RequestLogger;

use std::io::Write;

use chrono::{SecondsFormat, Utc};
use env_logger::Builder;
use log::kv::{self, Key, Value, VisitSource};
use log::{LevelFilter, Record};
use serde_json::{Map, Value as JsonValue};

use crate::config::{LogFormat, LoggerConfig};

/// 로거 초기화에 필요한 설정값
#[derive(Debug, Clone, Copy)]
pub struct LoggerSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
    pub with_stack: bool,
}

impl LoggerSettings {
    /// 환경 변수에서 로깅 설정을 읽습니다.
    pub fn from_env() -> Self {
        Self {
            level: LoggerConfig::level(),
            format: LoggerConfig::format(),
            with_stack: LoggerConfig::with_stack(),
        }
    }
}

/// 전역 로거를 설치합니다.
///
/// 이미 로거가 설치되어 있으면 에러를 반환합니다 (테스트에서 여러 번 호출되는 경우).
pub fn init(settings: &LoggerSettings) -> Result<(), log::SetLoggerError> {
    let mut builder = Builder::new();
    builder.filter_level(settings.level);

    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    let format = settings.format;
    builder.format(move |buf, record| {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let line = match format {
            LogFormat::Console => render_console(record, &timestamp),
            LogFormat::Json => render_json(record, &timestamp),
        };
        writeln!(buf, "{}", line)
    });

    builder.try_init()
}

/// 레코드의 key/value 쌍을 문자열로 수집합니다.
#[derive(Default)]
struct FieldCollector(Vec<(String, String)>);

impl<'kvs> VisitSource<'kvs> for FieldCollector {
    fn visit_pair(&mut self, key: Key<'kvs>, value: Value<'kvs>) -> Result<(), kv::Error> {
        self.0.push((key.as_str().to_string(), value.to_string()));
        Ok(())
    }
}

fn collect_fields(record: &Record<'_>) -> Vec<(String, String)> {
    let mut collector = FieldCollector::default();
    // 수집기는 실패하지 않는다
    let _ = record.key_values().visit(&mut collector);
    collector.0
}

/// `2024-01-01T00:00:00.000Z INFO  target message key=value` 형식
pub(crate) fn render_console(record: &Record<'_>, timestamp: &str) -> String {
    let mut line = format!(
        "{} {:<5} {} {}",
        timestamp,
        record.level(),
        record.target(),
        record.args()
    );

    for (key, value) in collect_fields(record) {
        if key == "stack" {
            line.push('\n');
            line.push_str(&value);
        } else {
            line.push_str(&format!(" {}={}", key, value));
        }
    }

    line
}

/// `{"ts":..,"level":..,"target":..,"msg":..,<fields>}` 형식
pub(crate) fn render_json(record: &Record<'_>, timestamp: &str) -> String {
    let mut object = Map::new();
    object.insert("ts".to_string(), JsonValue::from(timestamp));
    object.insert("level".to_string(), JsonValue::from(record.level().as_str()));
    object.insert("target".to_string(), JsonValue::from(record.target()));
    object.insert("msg".to_string(), JsonValue::from(record.args().to_string()));

    for (key, value) in collect_fields(record) {
        object.insert(key, JsonValue::from(value));
    }

    JsonValue::Object(object).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    const TS: &str = "2024-01-01T00:00:00.000Z";

    #[test]
    fn test_json_line_contains_fields() {
        let fields = vec![("trace_id", "abc-123"), ("status", "200")];
        let line = render_json(
            &Record::builder()
                .args(format_args!("요청 처리 완료"))
                .level(Level::Info)
                .target("users_service::access")
                .key_values(&fields)
                .build(),
            TS,
        );

        let parsed: JsonValue = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["level"], "INFO");
        assert_eq!(parsed["msg"], "요청 처리 완료");
        assert_eq!(parsed["trace_id"], "abc-123");
        assert_eq!(parsed["status"], "200");
        assert_eq!(parsed["ts"], TS);
    }

    #[test]
    fn test_console_line_format() {
        let fields = vec![("method", "GET")];
        let line = render_console(
            &Record::builder()
                .args(format_args!("hello"))
                .level(Level::Warn)
                .target("users_service")
                .key_values(&fields)
                .build(),
            TS,
        );

        assert!(line.starts_with(TS));
        assert!(line.contains("WARN"));
        assert!(line.contains("hello"));
        assert!(line.ends_with("method=GET"));
    }

    #[test]
    fn test_console_puts_stack_on_new_line() {
        let fields = vec![("stack", "frame 0\nframe 1")];
        let line = render_console(
            &Record::builder()
                .args(format_args!("boom"))
                .level(Level::Error)
                .target("users_service")
                .key_values(&fields)
                .build(),
            TS,
        );

        assert!(line.contains("boom\nframe 0"));
    }
}
