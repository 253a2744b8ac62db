//! 레이트 리미터가 사용하는 시간 소스

#[cfg(test)]
use std::sync::{Mutex, PoisonError};
#[cfg(test)]
use std::time::Duration;
use std::time::Instant;

/// 단조 증가 시간 소스
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// 실제 시스템 시간
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// 테스트용 수동 시계. `advance`를 호출해야만 시간이 흐릅니다.
#[cfg(test)]
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<Instant>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *current += by;
    }
}

#[cfg(test)]
impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
