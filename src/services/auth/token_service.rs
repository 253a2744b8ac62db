//! JWT 토큰 관리 서비스 구현
//!
//! JSON Web Token 기반의 인증 시스템을 제공합니다.
//! 액세스 토큰과 리프레시 토큰의 생성, 그리고 Bearer 토큰 검증을 담당합니다.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::Value;

use crate::config::JwtConfig;
use crate::domain::entities::users::User;
use crate::domain::models::token::{AuthClaims, TokenClaims, TokenPair};
use crate::errors::AppError;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT 토큰 관리 서비스
///
/// HMAC-SHA256 서명을 사용하여 JWT 토큰을 생성하고 검증합니다.
/// 액세스 토큰과 리프레시 토큰은 같은 비밀키로 서명되며 만료 시간만 다릅니다.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: impl Into<String>, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            access_ttl,
            refresh_ttl,
        }
    }

    /// 환경 변수(`JWT_SECRET`, `JWT_ACCESS_TTL_MINUTES`, `JWT_REFRESH_TTL_HOURS`)로 생성
    pub fn from_env() -> Self {
        Self::new(
            JwtConfig::secret(),
            Duration::minutes(JwtConfig::access_ttl_minutes()),
            Duration::hours(JwtConfig::refresh_ttl_hours()),
        )
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// 사용자를 위한 JWT 액세스 토큰 생성
    ///
    /// # Errors
    ///
    /// * `AppError::InternalError` - 토큰 서명 실패
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let access_token = token_service.generate_access_token(&user)?;
    /// ```
    pub fn generate_access_token(&self, user: &User) -> Result<String, AppError> {
        self.sign_claims(&Self::claims_for(user, self.access_ttl))
    }

    /// 사용자를 위한 리프레시 토큰 생성
    ///
    /// # Security
    ///
    /// 리프레시 토큰은 HttpOnly 쿠키로만 전달됩니다.
    pub fn generate_refresh_token(&self, user: &User) -> Result<String, AppError> {
        self.sign_claims(&Self::claims_for(user, self.refresh_ttl))
    }

    /// 토큰 쌍 생성 (액세스 + 리프레시)
    pub fn generate_token_pair(&self, user: &User) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.generate_access_token(user)?,
            refresh_token: self.generate_refresh_token(user)?,
        })
    }

    /// 주어진 클레임을 그대로 서명합니다.
    pub fn sign_claims(&self, claims: &TokenClaims) -> Result<String, AppError> {
        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());

        encode(&Header::new(ALGORITHM), claims, &encoding_key)
            .map_err(|e| AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e)))
    }

    /// JWT 토큰 검증 및 클레임 추출
    ///
    /// 서명과 만료(`exp`)를 검증한 뒤 `sub`, `role`, 만료 시각을 꺼냅니다.
    /// `sub`는 정수, 정수 값의 실수, 숫자 문자열을 모두 허용합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::AuthenticationError` - 만료, 잘못된 서명/형식, `sub` 누락 또는 해석 불가,
    ///   문자열이 아닌 `role`
    pub fn verify_token(&self, token: &str) -> Result<AuthClaims, AppError> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;

        let claims = decode::<HashMap<String, Value>>(token, &decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    AppError::AuthenticationError("토큰이 만료되었습니다".to_string())
                }
                _ => AppError::AuthenticationError(format!("유효하지 않은 토큰입니다: {}", e)),
            })?;

        let subject_id = parse_subject(claims.get("sub")).ok_or_else(|| {
            AppError::AuthenticationError("sub 클레임이 올바르지 않습니다".to_string())
        })?;

        let role = match claims.get("role") {
            None | Some(Value::Null) => None,
            Some(Value::String(role)) => Some(role.clone()),
            Some(_) => {
                return Err(AppError::AuthenticationError(
                    "role 클레임이 올바르지 않습니다".to_string(),
                ))
            }
        };

        let expires_at = parse_timestamp(claims.get("exp")).ok_or_else(|| {
            AppError::AuthenticationError("exp 클레임이 올바르지 않습니다".to_string())
        })?;

        let email = claims
            .get("email")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(AuthClaims {
            subject_id,
            email,
            role,
            expires_at,
        })
    }

    /// Bearer 토큰에서 실제 토큰 부분 추출
    ///
    /// HTTP Authorization 헤더의 "Bearer {token}" 형식에서 토큰 부분만을 추출합니다.
    ///
    /// ```rust,ignore
    /// let token = token_service.extract_bearer_token("Bearer eyJhbGciOi...")?;
    /// let claims = token_service.verify_token(token)?;
    /// ```
    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> Result<&'a str, AppError> {
        match auth_header.strip_prefix("Bearer ").map(str::trim) {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(AppError::AuthenticationError(
                "유효하지 않은 인증 헤더 형식입니다".to_string(),
            )),
        }
    }

    fn claims_for(user: &User, ttl: Duration) -> TokenClaims {
        TokenClaims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role.clone(),
            exp: (Utc::now() + ttl).timestamp(),
        }
    }
}

fn parse_subject(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral_f64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `i64` 범위 안의 정수 값 실수만 변환합니다. `as` 변환은 범위 밖에서 포화되므로 먼저 걸러낸다.
fn integral_f64(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64)
        .then_some(f as i64)
}

fn parse_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let Value::Number(n) = value? else {
        return None;
    };
    let secs = n.as_i64().or_else(|| n.as_f64().map(f64::floor).and_then(integral_f64))?;
    DateTime::from_timestamp(secs, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service() -> TokenService {
        TokenService::new("test-secret", Duration::minutes(15), Duration::hours(1200))
    }

    fn admin() -> User {
        User {
            id: 42,
            name: "Lev".to_string(),
            age: 32,
            email: "lev@x.com".to_string(),
            role: "admin".to_string(),
            password_hash: String::new(),
            balance: 0.0,
        }
    }

    fn sign_raw(secret: &str, payload: Value) -> String {
        encode(
            &Header::new(ALGORITHM),
            &payload,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_access_token_round_trip() {
        let service = service();
        let token = service.generate_access_token(&admin()).unwrap();

        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.subject_id, 42);
        assert_eq!(claims.role.as_deref(), Some("admin"));
        assert_eq!(claims.email.as_deref(), Some("lev@x.com"));

        let remaining = claims.expires_at - Utc::now();
        assert!(remaining > Duration::minutes(14) && remaining <= Duration::minutes(15));
    }

    #[test]
    fn test_token_pair_lifetimes_differ() {
        let service = service();
        let pair = service.generate_token_pair(&admin()).unwrap();

        assert_ne!(pair.access_token, pair.refresh_token);
        assert!(service.verify_token(&pair.refresh_token).is_ok());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = service();
        let token = service
            .sign_claims(&TokenClaims {
                sub: 42,
                email: "lev@x.com".to_string(),
                role: "admin".to_string(),
                exp: (Utc::now() - Duration::seconds(30)).timestamp(),
            })
            .unwrap();

        let err = service.verify_token(&token).unwrap_err();
        assert!(matches!(err, AppError::AuthenticationError(_)));
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let other = TokenService::new("other-secret", Duration::minutes(15), Duration::hours(1));
        let token = other.generate_access_token(&admin()).unwrap();

        let err = service().verify_token(&token).unwrap_err();
        assert!(matches!(err, AppError::AuthenticationError(_)));
    }

    #[test]
    fn test_subject_accepts_numeric_string_and_float() {
        let exp = (Utc::now() + Duration::minutes(5)).timestamp();

        let token = sign_raw("test-secret", json!({"sub": "17", "exp": exp}));
        let claims = service().verify_token(&token).unwrap();
        assert_eq!(claims.subject_id, 17);
        assert_eq!(claims.role, None);

        let token = sign_raw("test-secret", json!({"sub": 18.0, "exp": exp}));
        assert_eq!(service().verify_token(&token).unwrap().subject_id, 18);
    }

    #[test]
    fn test_bad_subject_or_role_is_rejected() {
        let exp = (Utc::now() + Duration::minutes(5)).timestamp();

        for payload in [
            json!({"exp": exp}),
            json!({"sub": "abc", "exp": exp}),
            json!({"sub": 1.5, "exp": exp}),
            json!({"sub": 1e19, "exp": exp}),
            json!({"sub": -1e19, "exp": exp}),
            json!({"sub": 1, "role": 7, "exp": exp}),
        ] {
            let token = sign_raw("test-secret", payload);
            assert!(matches!(
                service().verify_token(&token).unwrap_err(),
                AppError::AuthenticationError(_)
            ));
        }
    }

    #[test]
    fn test_expires_at_matches_exp_claim() {
        let exp = (Utc::now() + Duration::minutes(5)).timestamp();
        let token = sign_raw("test-secret", json!({"sub": 3, "exp": exp}));

        let claims = service().verify_token(&token).unwrap();
        assert_eq!(claims.expires_at.timestamp(), exp);
    }

    #[test]
    fn test_integral_f64_bounds() {
        assert_eq!(integral_f64(18.0), Some(18));
        assert_eq!(integral_f64(-4.0), Some(-4));
        assert_eq!(integral_f64(i64::MIN as f64), Some(i64::MIN));
        assert_eq!(integral_f64(i64::MAX as f64), None);
        assert_eq!(integral_f64(1e19), None);
        assert_eq!(integral_f64(f64::NAN), None);
    }

    #[test]
    fn test_extract_bearer_token() {
        let service = service();

        assert_eq!(service.extract_bearer_token("Bearer abc").unwrap(), "abc");
        assert!(service.extract_bearer_token("Basic abc").is_err());
        assert!(service.extract_bearer_token("Bearer ").is_err());
        assert!(service.extract_bearer_token("abc").is_err());
    }
}
