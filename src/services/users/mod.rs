//! 사용자 관리 서비스 모듈
//!
//! 사용자 생명주기와 관련된 비즈니스 로직을 담당합니다.
//!
//! # Features
//!
//! - 회원가입 및 관리자 사용자 생성
//! - 비밀번호 해싱 및 인증
//! - 전체/부분 수정, 삭제
//! - 사용자 간 잔액 이동

pub mod user_service;

pub use user_service::UserService;
