//! # Authentication Configuration Module
//!
//! JWT 토큰 서명 키와 만료 시간 등 인증 관련 설정을 관리하는 모듈입니다.
//!
//! ### JWT 토큰 설정
//! ```bash
//! export JWT_SECRET="your-super-secret-jwt-key"
//! export JWT_ACCESS_TTL_MINUTES="15"
//! export JWT_REFRESH_TTL_HOURS="1200"
//! ```

use std::env;

/// JWT 토큰 설정을 관리하는 구조체
///
/// 액세스 토큰과 리프레시 토큰은 같은 비밀키(HS256)로 서명되며
/// 만료 시간만 다릅니다.
pub struct JwtConfig;

impl JwtConfig {
    /// JWT 서명에 사용할 비밀키를 반환합니다.
    ///
    /// # 보안 요구사항
    ///
    /// - 최소 256비트 (32바이트) 길이
    /// - 환경별로 다른 키 사용
    ///
    /// # 기본값
    ///
    /// 환경 변수가 설정되지 않은 경우 개발용 기본 키를 사용하며 경고 로그가 출력됩니다.
    ///
    /// # 키 생성 예제
    ///
    /// ```bash
    /// openssl rand -base64 32
    /// ```
    pub fn secret() -> String {
        env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                log::warn!("JWT_SECRET not set, using default (not secure for production!)");
                "your-secret-key".to_string()
            })
    }

    /// 액세스 토큰 만료 시간 (분 단위). 기본값: 15분
    ///
    /// ```bash
    /// export JWT_ACCESS_TTL_MINUTES="5"
    /// ```
    pub fn access_ttl_minutes() -> i64 {
        env::var("JWT_ACCESS_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|m: &i64| *m > 0)
            .unwrap_or(15)
    }

    /// 리프레시 토큰 만료 시간 (시간 단위). 기본값: 1200시간 (50일)
    ///
    /// 리프레시 토큰은 `refresh-token` 쿠키로만 전달되며,
    /// 쿠키의 `Max-Age`도 이 값을 따릅니다.
    pub fn refresh_ttl_hours() -> i64 {
        env::var("JWT_REFRESH_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|h: &i64| *h > 0)
            .unwrap_or(1200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_ttl_defaults() {
        if env::var("JWT_ACCESS_TTL_MINUTES").is_err() {
            assert_eq!(JwtConfig::access_ttl_minutes(), 15);
        }
        if env::var("JWT_REFRESH_TTL_HOURS").is_err() {
            assert_eq!(JwtConfig::refresh_ttl_hours(), 1200);
        }
    }

    #[test]
    fn test_jwt_secret_never_empty() {
        assert!(!JwtConfig::secret().is_empty());
    }
}
