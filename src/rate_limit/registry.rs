//! 클라이언트별 토큰 버킷 레지스트리
//!
//! 엔트리 맵 전체를 하나의 Mutex로 보호하며, 토큰 계산도 락을 잡은 상태에서 수행합니다.
//! 처음 보는 클라이언트는 가득 찬 버킷으로 시작하고, 유휴 시간이 임계값을 넘은
//! 엔트리는 주기적인 정리 작업에서 제거됩니다.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::clock::{Clock, SystemClock};
use super::token_bucket::TokenBucket;
use crate::config::RateLimitConfig;
use crate::errors::AppError;

/// 클라이언트 하나의 리미터 상태
#[derive(Debug, Clone)]
struct RateLimiterEntry {
    bucket: TokenBucket,
    last_seen: Instant,
}

/// IP별 레이트 리미터 레지스트리
pub struct RateLimiterRegistry {
    entries: Mutex<HashMap<String, RateLimiterEntry>>,
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
}

impl RateLimiterRegistry {
    /// 시스템 시계를 사용하는 레지스트리를 생성합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 설정값이 유효하지 않은 경우
    pub fn new(config: RateLimitConfig) -> Result<Self, AppError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// 주입된 시계를 사용하는 레지스트리를 생성합니다.
    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        config.validate()?;

        Ok(Self {
            entries: Mutex::new(HashMap::new()),
            config,
            clock,
        })
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, RateLimiterEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 토큰 하나를 소비해 요청 허용 여부를 결정합니다.
    ///
    /// 거부된 요청도 `last_seen`을 갱신합니다.
    pub fn allow(&self, identity: &str) -> bool {
        let now = self.clock.now();
        let mut entries = self.lock();

        if let Some(entry) = entries.get_mut(identity) {
            entry.last_seen = now;
            return entry.bucket.try_acquire(now);
        }

        // 처음 보는 클라이언트만 키를 할당한다
        let mut bucket = TokenBucket::full(self.config.burst_size, self.config.per_second, now);
        let allowed = bucket.try_acquire(now);
        entries.insert(
            identity.to_string(),
            RateLimiterEntry {
                bucket,
                last_seen: now,
            },
        );
        allowed
    }

    /// 유휴 임계값을 넘긴 엔트리를 제거하고 제거된 개수를 반환합니다.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let idle_timeout = self.config.idle_timeout;
        let mut entries = self.lock();

        let before = entries.len();
        entries.retain(|_, entry| now.saturating_duration_since(entry.last_seen) <= idle_timeout);
        before - entries.len()
    }

    /// 현재 추적 중인 클라이언트 수
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 주기적으로 `sweep`을 실행하는 백그라운드 작업을 시작합니다.
    ///
    /// 반환된 핸들의 `stop`을 호출하면 작업이 종료됩니다.
    pub fn start_eviction(self: &Arc<Self>) -> EvictionHandle {
        let registry = Arc::clone(self);
        let period = self.config.sweep_interval;
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // 첫 tick은 즉시 완료된다
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        let evicted = registry.sweep();
                        if evicted > 0 {
                            log::debug!(
                                "레이트 리미터 유휴 엔트리 {}개 정리 (남은 엔트리 {}개)",
                                evicted,
                                registry.len()
                            );
                        }
                    }
                }
            }

            log::debug!("레이트 리미터 정리 작업 종료");
        });

        EvictionHandle {
            stop_tx: Some(stop_tx),
            task,
        }
    }
}

/// 정리 작업 수명 관리 핸들
pub struct EvictionHandle {
    stop_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl EvictionHandle {
    /// 정리 작업을 멈추고 종료될 때까지 기다립니다.
    pub async fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            log::warn!("레이트 리미터 정리 작업이 비정상 종료됨: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::clock::ManualClock;
    use std::time::Duration;

    fn registry(clock: Arc<ManualClock>) -> RateLimiterRegistry {
        RateLimiterRegistry::with_clock(RateLimitConfig::default(), clock).unwrap()
    }

    #[test]
    fn test_burst_admits_at_most_capacity() {
        let clock = Arc::new(ManualClock::new());
        let registry = registry(clock);

        let admitted = (0..25).filter(|_| registry.allow("10.0.0.1")).count();
        assert_eq!(admitted, 10);
    }

    #[test]
    fn test_identities_are_independent() {
        let clock = Arc::new(ManualClock::new());
        let registry = registry(clock);

        for _ in 0..10 {
            assert!(registry.allow("10.0.0.1"));
        }
        assert!(!registry.allow("10.0.0.1"));
        assert!(registry.allow("10.0.0.2"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_waiting_one_interval_admits_again() {
        let clock = Arc::new(ManualClock::new());
        let registry = registry(clock.clone());

        while registry.allow("10.0.0.1") {}
        assert!(!registry.allow("10.0.0.1"));

        // 5/s 이므로 200ms 후 토큰 하나
        clock.advance(Duration::from_millis(200));
        assert!(registry.allow("10.0.0.1"));
        assert!(!registry.allow("10.0.0.1"));
    }

    #[test]
    fn test_idle_identity_is_evicted_and_starts_full() {
        let clock = Arc::new(ManualClock::new());
        let registry = registry(clock.clone());

        while registry.allow("10.0.0.1") {}
        assert_eq!(registry.sweep(), 0);

        clock.advance(Duration::from_secs(181));
        assert_eq!(registry.sweep(), 1);
        assert!(registry.is_empty());

        let admitted = (0..25).filter(|_| registry.allow("10.0.0.1")).count();
        assert_eq!(admitted, 10);
    }

    #[test]
    fn test_denied_requests_refresh_last_seen() {
        let clock = Arc::new(ManualClock::new());
        let config = RateLimitConfig {
            per_second: 0.001,
            ..RateLimitConfig::default()
        };
        let registry = RateLimiterRegistry::with_clock(config, clock.clone()).unwrap();

        while registry.allow("10.0.0.1") {}
        clock.advance(Duration::from_secs(170));
        assert!(!registry.allow("10.0.0.1"));
        clock.advance(Duration::from_secs(20));

        assert_eq!(registry.sweep(), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_first_request_counts_and_entry_is_reused() {
        let clock = Arc::new(ManualClock::new());
        let registry = registry(clock);

        // 첫 요청은 새 엔트리를 만들면서 토큰 하나를 소비한다
        assert!(registry.allow("10.0.0.1"));
        assert_eq!(registry.len(), 1);

        for _ in 0..9 {
            assert!(registry.allow("10.0.0.1"));
        }
        assert!(!registry.allow("10.0.0.1"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = RateLimitConfig {
            burst_size: 0,
            ..RateLimitConfig::default()
        };
        assert!(RateLimiterRegistry::new(config).is_err());
    }

    #[test]
    fn test_concurrent_allow_never_exceeds_capacity() {
        let clock = Arc::new(ManualClock::new());
        let registry = Arc::new(registry(clock));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || (0..10).filter(|_| registry.allow("10.0.0.9")).count())
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 10);
    }

    #[actix_web::test]
    async fn test_eviction_task_sweeps_and_stops() {
        let clock = Arc::new(ManualClock::new());
        let config = RateLimitConfig {
            sweep_interval: Duration::from_millis(10),
            ..RateLimitConfig::default()
        };
        let registry = Arc::new(RateLimiterRegistry::with_clock(config, clock.clone()).unwrap());

        registry.allow("10.0.0.1");
        clock.advance(Duration::from_secs(600));

        let handle = registry.start_eviction();
        let mut waited = 0;
        while !registry.is_empty() && waited < 100 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            waited += 1;
        }
        handle.stop().await;

        assert!(registry.is_empty());
    }
}
