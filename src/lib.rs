//! 사용자 관리 서비스 백엔드
//!
//! Rust 기반의 사용자 관리 HTTP 서비스입니다.
//! JWT 기반 인증과 역할 검사, IP별 토큰 버킷 레이트 리밋,
//! 요청 단위 추적 ID와 패닉 복구를 포함한 요청 파이프라인을 제공합니다.
//!
//! # Features
//!
//! - **사용자 관리**: 회원가입, 조회, 관리자 전용 생성/수정/삭제
//! - **JWT 인증**: HS256 액세스/리프레시 토큰
//! - **레이트 리밋**: 클라이언트 IP별 토큰 버킷, 유휴 엔트리 주기적 정리
//! - **PostgreSQL**: `sqlx` 기반 저장소 (테스트/로컬용 인메모리 저장소 포함)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ Request Stages  │ ← 컨텍스트, 패닉 복구, 접근 로그, CORS, 보안 헤더, 레이트 리밋
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청/응답 처리 (보호 라우트는 인증 단계 경유)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 비즈니스 로직
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← UserStore (PostgreSQL / 메모리)
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use users_service::routes::configure_all_routes;
//! use users_service::server::{build_app, AppState};
//!
//! let state = AppState::new(user_service, token_service, registry);
//! HttpServer::new(move || build_app(state.clone(), configure_all_routes))
//!     .bind(("0.0.0.0", 8080))?
//!     .run()
//!     .await
//! ```

pub mod config;
pub mod db;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod rate_limit;
pub mod logging;
pub mod routes;
pub mod handlers;
pub mod errors;
pub mod middlewares;
pub mod server;
pub mod client;
