//! Users Entity Module
//!
//! 사용자 도메인의 핵심 엔티티와 변경 모델을 정의하는 모듈입니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use crate::domain::entities::users::{NewUser, DEFAULT_ROLE};
//!
//! let new_user = NewUser {
//!     name: "Lev".to_string(),
//!     age: 32,
//!     email: "lev@x.com".to_string(),
//!     role: DEFAULT_ROLE.to_string(),
//!     password_hash,
//! };
//! let user = store.create(new_user).await?;
//! ```

pub mod user;

pub use user::{NewUser, User, UserPatch, UserReplacement, ADMIN_ROLE, DEFAULT_ROLE};
