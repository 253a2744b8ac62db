//! # Domain Layer Module
//!
//! 도메인 계층을 구성하는 핵심 모듈입니다.
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── Entities      - 저장소에 영속되는 사용자 엔티티
//! ├── DTOs          - 요청/응답 데이터 전송 객체
//! └── Models        - 인증, 토큰, 요청 컨텍스트 모델
//!      │
//!      ▼
//! Application Layer (Services)
//!      │
//!      ▼
//! Infrastructure Layer (Repositories, DB)
//! ```
//!
//! ## 설계 원칙
//!
//! - **의존성 규칙**: 외부 계층이 내부 계층에 의존합니다
//! - **유효성 검증**: 입력 데이터는 DTO 경계에서 `validator`로 검증합니다
//! - **명시적 변환**: DTO와 엔티티 사이의 변환은 `From` 구현으로 표현합니다

pub mod entities;
pub mod dto;
pub mod models;

pub use entities::*;
pub use dto::*;
pub use models::*;
