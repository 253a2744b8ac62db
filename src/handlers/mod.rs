//! HTTP 핸들러 모듈
//!
//! 핸들러는 요청 본문을 역직렬화한 뒤 서비스 연산 하나를 호출하고,
//! 결과를 JSON 응답으로 변환합니다. 에러는 `AppError`의 `ResponseError` 구현이
//! 상태 코드와 `{"error": ...}` 본문으로 바꿉니다.

pub mod health;
pub mod users;
pub mod auth;
