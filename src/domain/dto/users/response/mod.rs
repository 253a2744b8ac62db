//! 사용자 응답 DTO 모듈
//!
//! 사용자 엔티티 자체는 비밀번호 해시를 제외하고 그대로 직렬화되므로,
//! 이 모듈에는 엔티티로 표현되지 않는 응답만 정의합니다.

pub mod user_response;

pub use user_response::{LoginResponse, ReadyResponse};
