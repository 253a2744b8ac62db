//! User Entity Implementation
//!
//! `users` 테이블의 한 행을 표현하는 사용자 엔티티입니다.

use serde::{Deserialize, Serialize};

/// 기본 역할
pub const DEFAULT_ROLE: &str = "user";

/// 관리자 역할. 상태를 변경하는 `/users` 라우트는 이 역할을 요구합니다.
pub const ADMIN_ROLE: &str = "admin";

/// 사용자 엔티티
///
/// 비밀번호 해시는 JSON 응답으로 직렬화되지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// 사용자 고유 ID (BIGSERIAL)
    pub id: i64,
    /// 사용자 이름
    pub name: String,
    /// 나이 (0-130)
    pub age: i32,
    /// 사용자 이메일 (unique)
    pub email: String,
    /// 사용자 역할 (`user`, `admin`)
    pub role: String,
    /// bcrypt 비밀번호 해시
    #[serde(skip_serializing, default)]
    #[sqlx(rename = "password")]
    pub password_hash: String,
    /// 잔액 (0 이상)
    pub balance: f64,
}

/// 저장 전의 새 사용자
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub age: i32,
    pub email: String,
    pub role: String,
    pub password_hash: String,
}

/// PUT 요청으로 교체되는 필드
#[derive(Debug, Clone)]
pub struct UserReplacement {
    pub name: String,
    pub age: i32,
    pub email: String,
}

/// PATCH 요청으로 변경되는 필드. `None`인 필드는 건드리지 않습니다.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub email: Option<String>,
}

impl UserPatch {
    /// 변경할 필드가 하나도 없는지 확인
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.email.is_none()
    }

    /// 엔티티에 변경 사항을 적용합니다.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(age) = self.age {
            user.age = age;
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
    }
}
