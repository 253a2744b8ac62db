//! 인증 및 보안 서비스 모듈
//!
//! HS256 JWT 액세스/리프레시 토큰의 발급과 검증을 담당합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::auth::TokenService;
//!
//! let token_service = TokenService::from_env();
//! let tokens = token_service.generate_token_pair(&user)?;
//! let claims = token_service.verify_token(&tokens.access_token)?;
//! ```

pub mod token_service;

pub use token_service::TokenService;
