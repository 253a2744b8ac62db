//! # Domain Models Module
//!
//! 영속성을 갖지 않는 도메인 모델과 값 객체를 정의합니다.
//!
//! ```text
//! models/
//! ├── auth/      ← 인증 모드, 역할 요구사항, 인증된 사용자 추출자
//! ├── context/   ← 요청 단위 컨텍스트 (trace id, 로거, 인증 주체)
//! └── token/     ← JWT 클레임과 토큰 쌍
//! ```

pub mod auth;
pub mod context;
pub mod token;

pub use auth::*;
pub use context::*;
pub use token::*;
