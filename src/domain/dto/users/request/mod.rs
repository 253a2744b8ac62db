//! 사용자 요청 DTO 모듈
//!
//! 클라이언트로부터 받은 JSON 본문을 역직렬화하고 `validator`로 검증합니다.
//! 검증은 핸들러에서 서비스 호출 전에 수행합니다.
//!
//! ```rust,ignore
//! use validator::Validate;
//!
//! payload.validate()?; // ValidationErrors -> AppError::ValidationError (400)
//! ```

pub mod create_user;
pub mod update_user;
pub mod auth_request;

pub use create_user::{CreateUserRequest, RegisterRequest, KNOWN_ROLES};
pub use update_user::{PatchUserRequest, ReplaceUserRequest};
pub use auth_request::LoginRequest;
