//! 인증/인가 모델
//!
//! - [`authenticated_user`] - 인증된 사용자 추출자

pub mod authenticated_user;

pub use authenticated_user::AuthenticatedUser;
