//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 서비스는 애플리케이션 시작 시 한 번 생성되어 `web::Data`로 핸들러와 미들웨어에 주입됩니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::{auth::TokenService, users::UserService};
//!
//! let user_service = web::Data::new(UserService::with_env_cost(store));
//! let token_service = web::Data::new(TokenService::from_env());
//! ```

pub mod users;
pub mod auth;

pub use users::UserService;
pub use auth::TokenService;
