//! JWT 인증 토큰 클레임 및 페어링 된 세트
//!
//! 발급 시 사용하는 클레임 구조와, 검증 후 미들웨어가 사용하는 최소 클레임을 정의합니다.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 발급되는 JWT 토큰의 클레임(Payload) 구조체
///
/// ## 클레임 구성
///
/// - `sub`: 토큰의 주체 (사용자 ID)
/// - `email`: 사용자 이메일
/// - `role`: 사용자 역할
/// - `exp`: 토큰 만료 시간 (Unix timestamp)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: i64,
    pub email: String,
    pub role: String,
    pub exp: i64,
}

/// 검증을 통과한 토큰에서 추출한 클레임
///
/// 외부에서 발급된 토큰도 받아야 하므로 `sub` 외의 필드는 모두 선택사항입니다.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthClaims {
    pub subject_id: i64,
    pub email: Option<String>,
    pub role: Option<String>,
    /// 검증된 `exp` 클레임
    pub expires_at: DateTime<Utc>,
}

/// 로그인 시 발급되는 토큰 쌍
#[derive(Debug, Clone)]
pub struct TokenPair {
    /// 액세스 토큰 (API 접근용 단기 토큰)
    pub access_token: String,
    /// 리프레시 토큰 (쿠키로 전달되는 장기 토큰)
    pub refresh_token: String,
}
