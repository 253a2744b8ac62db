//! 사용자 수정 요청 DTO (PUT / PATCH)
//!
//! 두 요청 모두 본문에 `id`를 포함해야 하며, 경로의 ID와 일치하지 않으면 400으로 거부됩니다.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::users::{UserPatch, UserReplacement};

/// 전체 교체 요청 (`PUT /users/{id}`)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReplaceUserRequest {
    pub id: i64,

    #[validate(length(min = 1, message = "이름을 입력해주세요"))]
    pub name: String,

    #[validate(range(min = 0, max = 130, message = "나이는 0-130 사이여야 합니다"))]
    pub age: i32,

    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,
}

impl From<ReplaceUserRequest> for UserReplacement {
    fn from(request: ReplaceUserRequest) -> Self {
        Self {
            name: request.name,
            age: request.age,
            email: request.email,
        }
    }
}

/// 부분 수정 요청 (`PATCH /users/{id}`)
///
/// 생략된 필드는 변경되지 않습니다. `id`만 있는 요청은 아무것도 바꾸지 않고
/// 현재 사용자 정보를 그대로 반환합니다.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PatchUserRequest {
    pub id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "이름을 입력해주세요"))]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, max = 130, message = "나이는 0-130 사이여야 합니다"))]
    pub age: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: Option<String>,
}

impl From<PatchUserRequest> for UserPatch {
    fn from(request: PatchUserRequest) -> Self {
        Self {
            name: request.name,
            age: request.age,
            email: request.email,
        }
    }
}
