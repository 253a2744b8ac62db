//! IP별 레이트 리미팅
//!
//! - [`clock`] - 주입 가능한 시간 소스 (`SystemClock`, 테스트 빌드 전용 `ManualClock`)
//! - [`token_bucket`] - 토큰 버킷 알고리즘
//! - [`registry`] - 클라이언트별 버킷 관리와 유휴 엔트리 정리 작업
//!
//! ```rust,ignore
//! let registry = Arc::new(RateLimiterRegistry::new(RateLimitConfig::from_env())?);
//! let eviction = registry.start_eviction();
//!
//! if !registry.allow("203.0.113.7") {
//!     // 429
//! }
//!
//! eviction.stop().await;
//! ```

pub mod clock;
pub mod token_bucket;
pub mod registry;

pub use clock::{Clock, SystemClock};
pub use registry::{EvictionHandle, RateLimiterRegistry};
pub use token_bucket::TokenBucket;
