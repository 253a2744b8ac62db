//! 데이터 액세스 계층을 담당하는 리포지토리 모듈
//!
//! PostgreSQL(`sqlx`)을 주 저장소로 사용하고, 로컬 실행과 테스트를 위한
//! 메모리 저장소를 함께 제공합니다. 두 구현 모두 [`users::UserStore`]를 구현합니다.

pub mod users;

pub use users::{MemoryUserStore, PgUserRepository, UserStore};
