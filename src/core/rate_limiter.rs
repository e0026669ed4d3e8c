use crate::utils::error::{PlantCareError, Result};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Token bucket 限流器，每個外部 API 一個實例。
///
/// 除了依經過時間補充 token 外，還記錄最近 `capacity` 次放行的時間，
/// 保證任何長度為 `window` 的滑動區間內放行次數不超過 `capacity`。
/// 鎖在等待期間持續持有，因此等待者依序放行（tokio Mutex 為 FIFO）。
#[derive(Debug)]
pub struct RateLimiter {
    capacity: u32,
    window: Duration,
    state: Mutex<BucketState>,
}

#[derive(Debug)]
struct BucketState {
    tokens: u32,
    last_refill: Instant,
    grants: VecDeque<Instant>,
}

impl RateLimiter {
    pub fn new(capacity: u32, window: Duration) -> Result<Self> {
        if capacity == 0 {
            return Err(PlantCareError::InvalidConfigValueError {
                field: "rate_limit".to_string(),
                value: capacity.to_string(),
                reason: "Rate limit capacity must be greater than zero".to_string(),
            });
        }
        if window.is_zero() {
            return Err(PlantCareError::InvalidConfigValueError {
                field: "rate_limit_window".to_string(),
                value: format!("{:?}", window),
                reason: "Rate limit window must be longer than zero".to_string(),
            });
        }

        Ok(Self {
            capacity,
            window,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
                grants: VecDeque::with_capacity(capacity as usize),
            }),
        })
    }

    /// 每分鐘 `capacity` 次
    pub fn per_minute(capacity: u32) -> Result<Self> {
        Self::new(capacity, DEFAULT_WINDOW)
    }

    /// 等到有 token 可用後消耗一個。只會延遲，不會失敗。
    pub async fn acquire(&self) {
        let mut state = self.state.lock().await;

        loop {
            let now = Instant::now();
            state.refill(now, self.capacity, self.window);

            match state.wait_time(now, self.capacity, self.window) {
                None => {
                    state.tokens -= 1;
                    state.grants.push_back(now);
                    if state.grants.len() > self.capacity as usize {
                        state.grants.pop_front();
                    }
                    return;
                }
                Some(wait) => {
                    tracing::debug!("⏳ Rate limit reached, waiting {:?}", wait);
                    sleep(wait).await;
                }
            }
        }
    }

    #[cfg(test)]
    async fn available_tokens(&self) -> u32 {
        let mut state = self.state.lock().await;
        state.refill(Instant::now(), self.capacity, self.window);
        state.tokens
    }
}

impl BucketState {
    /// 依經過時間補充 token，上限為 capacity。只有實際補充時才推進 last_refill，
    /// 不足一個 token 的零頭會累積到下次。
    fn refill(&mut self, now: Instant, capacity: u32, window: Duration) {
        let elapsed = now.saturating_duration_since(self.last_refill);
        let new_tokens = elapsed.as_nanos() * u128::from(capacity) / window.as_nanos();

        if new_tokens > 0 {
            let refilled = u128::from(self.tokens) + new_tokens;
            self.tokens = refilled.min(u128::from(capacity)) as u32;
            self.last_refill = now;
        }
    }

    fn wait_time(&self, now: Instant, capacity: u32, window: Duration) -> Option<Duration> {
        let mut wait = Duration::ZERO;

        if self.tokens == 0 {
            let per_token = window / capacity;
            let since_refill = now.saturating_duration_since(self.last_refill);
            wait = wait.max(per_token.saturating_sub(since_refill));
        }

        if self.grants.len() >= capacity as usize {
            if let Some(oldest) = self.grants.front() {
                let reopens_at = *oldest + window;
                wait = wait.max(reopens_at.saturating_duration_since(now));
            }
        }

        if self.tokens > 0 && wait.is_zero() {
            None
        } else {
            // 整數捨入可能算出 0，至少睡一小段避免空轉
            Some(wait.max(Duration::from_millis(1)))
        }
    }
}
