//! 사용자 데이터 액세스 계층을 담당하는 리포지토리 모듈
//!
//! 서비스 계층은 [`UserStore`] trait 객체를 통해서만 저장소에 접근합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use crate::repositories::users::{MemoryUserStore, UserStore};
//!
//! let store: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
//! let user = store.get_by_email("user@example.com").await?;
//! ```

pub mod user_store;
pub mod user_repo;
pub mod memory_store;

pub use user_store::UserStore;
pub use user_repo::PgUserRepository;
pub use memory_store::MemoryUserStore;
