//! # Domain Entities Module
//!
//! 비즈니스 도메인의 핵심 엔티티들을 정의합니다.
//! PostgreSQL `users` 테이블과 1:1로 대응되는 구조체를 포함합니다.
//!
//! ```text
//! Domain Layer
//! ├── entities/     ← 이 모듈 (영속 엔티티)
//! ├── models/       ← 인증 클레임, 요청 컨텍스트
//! └── dto/          ← 요청/응답 데이터 전송 객체
//! ```

pub mod users;

pub use users::*;
