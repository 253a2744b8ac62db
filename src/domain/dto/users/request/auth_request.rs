//! 인증 요청관련 DTO
//!
//! 로그인을 요청하는 사용자들의 요청 정보를 매핑합니다.
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 로그인 요청 구조체
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 1, message = "비밀번호를 입력해주세요"))]
    pub password: String,
}
