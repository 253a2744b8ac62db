//! HTTP 파이프라인 설정 (Rate Limiting, CORS)

use std::env;
use std::time::Duration;

use log::{error, info};

use crate::errors::AppError;

/// Rate Limiting 설정 구조체
///
/// 모든 클라이언트 IP가 같은 설정을 공유합니다.
///
/// | 변수 | 기본값 |
/// |------|--------|
/// | `RATE_LIMIT_PER_SECOND` | 5 |
/// | `RATE_LIMIT_BURST_SIZE` | 10 |
/// | `RATE_LIMIT_SWEEP_INTERVAL_SECS` | 60 |
/// | `RATE_LIMIT_IDLE_TIMEOUT_SECS` | 180 |
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitConfig {
    /// 초당 보충되는 토큰 수
    pub per_second: f64,
    /// 버킷 최대 용량 (버스트 허용량)
    pub burst_size: u32,
    /// 유휴 엔트리 정리 주기
    pub sweep_interval: Duration,
    /// 이 시간 이상 요청이 없던 IP는 정리 대상
    pub idle_timeout: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_second: 5.0,
            burst_size: 10,
            sweep_interval: Duration::from_secs(60),
            idle_timeout: Duration::from_secs(180),
        }
    }
}

impl RateLimitConfig {
    /// 환경변수에서 Rate Limiting 설정을 로드합니다
    ///
    /// 파싱에 실패한 값은 에러 로그를 남기고 기본값을 사용합니다.
    ///
    /// # Examples
    ///
    /// ```bash
    /// # .env.dev (개발 환경)
    /// RATE_LIMIT_PER_SECOND=20
    /// RATE_LIMIT_BURST_SIZE=40
    /// ```
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let per_second = read_or("RATE_LIMIT_PER_SECOND", defaults.per_second);
        let burst_size = read_or("RATE_LIMIT_BURST_SIZE", defaults.burst_size);
        let sweep_secs = read_or(
            "RATE_LIMIT_SWEEP_INTERVAL_SECS",
            defaults.sweep_interval.as_secs(),
        );
        let idle_secs = read_or(
            "RATE_LIMIT_IDLE_TIMEOUT_SECS",
            defaults.idle_timeout.as_secs(),
        );

        let config = Self {
            per_second,
            burst_size,
            sweep_interval: Duration::from_secs(sweep_secs),
            idle_timeout: Duration::from_secs(idle_secs),
        };

        info!("Rate Limiting 설정 로드됨: {:?}", config);
        config
    }

    /// 설정값의 유효성을 검사합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 보충 속도가 양수가 아니거나 버스트가 0인 경우
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.per_second.is_finite() || self.per_second <= 0.0 {
            return Err(AppError::ValidationError(
                "per_second must be a positive number".to_string(),
            ));
        }
        if self.burst_size == 0 {
            return Err(AppError::ValidationError(
                "burst_size must be at least 1".to_string(),
            ));
        }
        if self.sweep_interval.is_zero() {
            return Err(AppError::ValidationError(
                "sweep_interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn read_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or_else(|e| {
            error!("{} 파싱 실패: {}. 기본값 {} 사용", key, e, default);
            default
        }),
        Err(_) => default,
    }
}

/// CORS 설정
pub struct CorsConfig;

impl CorsConfig {
    const DEFAULT_ORIGINS: [&'static str; 3] = [
        "http://localhost:3000",
        "https://example.com",
        "https://anotherdomain.com",
    ];

    /// 허용할 Origin 목록 (`CORS_ALLOWED_ORIGINS`, 콤마 구분)
    pub fn allowed_origins() -> Vec<String> {
        match env::var("CORS_ALLOWED_ORIGINS") {
            Ok(raw) if !raw.trim().is_empty() => Self::parse_origins(&raw),
            _ => Self::DEFAULT_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }

    fn parse_origins(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Preflight 응답 캐시 시간 (초)
    pub fn max_age() -> usize {
        3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_defaults() {
        let config = RateLimitConfig::default();
        assert_eq!(config.per_second, 5.0);
        assert_eq!(config.burst_size, 10);
        assert_eq!(config.sweep_interval, Duration::from_secs(60));
        assert_eq!(config.idle_timeout, Duration::from_secs(180));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rate_limit_validation() {
        let zero_rate = RateLimitConfig {
            per_second: 0.0,
            ..RateLimitConfig::default()
        };
        assert!(zero_rate.validate().is_err());

        let zero_burst = RateLimitConfig {
            burst_size: 0,
            ..RateLimitConfig::default()
        };
        assert!(zero_burst.validate().is_err());

        let nan_rate = RateLimitConfig {
            per_second: f64::NAN,
            ..RateLimitConfig::default()
        };
        assert!(nan_rate.validate().is_err());
    }

    #[test]
    fn test_cors_origin_parsing() {
        let origins = CorsConfig::parse_origins(" http://a.test, ,https://b.test ");
        assert_eq!(origins, vec!["http://a.test", "https://b.test"]);
    }
}
