//! # Data Transfer Objects
//!
//! HTTP API 계약을 정의하는 요청/응답 구조체 모듈입니다.
//! 모든 요청 DTO는 `serde::Deserialize`와 `validator::Validate`를 구현합니다.

pub mod users;

pub use users::*;
