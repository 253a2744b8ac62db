//! 토큰 버킷
//!
//! 불변식: `0 <= tokens <= capacity`. 경과 시간에 비례해 토큰이 보충되며
//! 용량을 넘지 않습니다.

use std::time::Instant;

#[derive(Debug, Clone)]
pub struct TokenBucket {
    capacity: f64,
    refill_per_second: f64,
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// 가득 찬 버킷을 생성합니다.
    pub fn full(capacity: u32, refill_per_second: f64, now: Instant) -> Self {
        let capacity = f64::from(capacity);
        Self {
            capacity,
            refill_per_second,
            tokens: capacity,
            last_refill: now,
        }
    }

    /// 경과 시간만큼 보충한 뒤 토큰 하나를 소비합니다.
    ///
    /// # Returns
    ///
    /// 토큰을 소비했으면 `true`, 부족하면 `false`
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        self.refill(now);

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        if elapsed > 0.0 {
            self.tokens = (self.tokens + elapsed * self.refill_per_second).min(self.capacity);
            self.last_refill = now;
        }
    }

    pub fn tokens(&self) -> f64 {
        self.tokens
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_full_bucket_admits_capacity_requests() {
        let now = Instant::now();
        let mut bucket = TokenBucket::full(3, 1.0, now);

        assert!(bucket.try_acquire(now));
        assert!(bucket.try_acquire(now));
        assert!(bucket.try_acquire(now));
        assert!(!bucket.try_acquire(now));
    }

    #[test]
    fn test_refill_is_capped_at_capacity() {
        let now = Instant::now();
        let mut bucket = TokenBucket::full(2, 10.0, now);
        assert!(bucket.try_acquire(now));

        let later = now + Duration::from_secs(60);
        assert!(bucket.try_acquire(later));
        assert!(bucket.tokens() <= bucket.capacity());
        assert_eq!(bucket.tokens(), 1.0);
    }

    #[test]
    fn test_partial_refill_does_not_admit() {
        let now = Instant::now();
        let mut bucket = TokenBucket::full(1, 2.0, now);
        assert!(bucket.try_acquire(now));

        // 0.25초 * 2/s = 0.5 토큰
        assert!(!bucket.try_acquire(now + Duration::from_millis(250)));
        // 누적 0.5초 = 1 토큰
        assert!(bucket.try_acquire(now + Duration::from_millis(500)));
    }
}
