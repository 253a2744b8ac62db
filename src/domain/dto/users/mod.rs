//! # User DTOs
//!
//! 사용자 API의 요청/응답 데이터 전송 객체입니다.
//!
//! ```text
//! dto/users/
//! ├── request/   ← RegisterRequest, CreateUserRequest, ReplaceUserRequest,
//! │                PatchUserRequest, LoginRequest
//! └── response/  ← LoginResponse, ReadyResponse
//! ```

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
