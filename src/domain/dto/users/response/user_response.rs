use serde::{Deserialize, Serialize};

/// 로그인 응답 DTO
///
/// 액세스 토큰만 본문에 담기며, 리프레시 토큰은 `refresh-token` 쿠키로 전달됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    #[serde(rename = "access-token")]
    pub access_token: String,
}

impl LoginResponse {
    pub fn new(access_token: String) -> Self {
        Self {
            message: "login successful".to_string(),
            access_token,
        }
    }
}

/// 준비 상태 응답 (`GET /ready`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyResponse {
    pub status: String,
}

impl ReadyResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
