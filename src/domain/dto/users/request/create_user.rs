//! # 사용자 생성 요청 DTO
//!
//! 회원가입(`POST /register`)과 관리자 사용자 생성(`POST /users`) 요청 데이터 구조를 정의합니다.
//!
//! ## 검증 규칙
//!
//! | 필드 | 규칙 |
//! |------|------|
//! | `name` | 필수, 1자 이상 |
//! | `age` | 0-130 |
//! | `email` | 이메일 형식 |
//! | `password` | 최소 8자 |
//! | `role` | (관리자 생성만) `user`, `admin` 중 하나 |

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::entities::users::DEFAULT_ROLE;

/// 허용되는 역할 목록
pub const KNOWN_ROLES: [&str; 2] = ["user", "admin"];

/// 회원가입 요청 DTO
///
/// # JSON 예제
///
/// ```json
/// {
///   "name": "Lev",
///   "age": 32,
///   "email": "lev@x.com",
///   "password": "secret123"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "이름을 입력해주세요"))]
    pub name: String,

    #[validate(range(min = 0, max = 130, message = "나이는 0-130 사이여야 합니다"))]
    pub age: i32,

    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 8, message = "비밀번호는 최소 8자 이상이어야 합니다"))]
    pub password: String,
}

/// 관리자용 사용자 생성 요청 DTO
///
/// `role`을 생략하면 `user` 역할로 생성됩니다.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "이름을 입력해주세요"))]
    pub name: String,

    #[validate(range(min = 0, max = 130, message = "나이는 0-130 사이여야 합니다"))]
    pub age: i32,

    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 8, message = "비밀번호는 최소 8자 이상이어야 합니다"))]
    pub password: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_role"))]
    pub role: Option<String>,
}

impl CreateUserRequest {
    /// 요청된 역할 또는 기본 역할
    pub fn role_or_default(&self) -> String {
        self.role.clone().unwrap_or_else(|| DEFAULT_ROLE.to_string())
    }
}

/// 역할 이름이 알려진 역할인지 검증합니다.
fn validate_role(role: &str) -> Result<(), ValidationError> {
    if !KNOWN_ROLES.contains(&role) {
        return Err(ValidationError::new("unknown_role")
            .with_message("역할은 user, admin 중 하나여야 합니다".into()));
    }
    Ok(())
}
