//! Politeness gate shared by all workers. Since each run targets one domain,
//! robots crawl-delay reduces to a single minimum spacing between dispatched
//! fetches, serialized through one mutex so concurrent workers share the
//! same schedule.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

pub struct RateLimiter {
    interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// `requests_per_second` sets the base interval; a robots crawl-delay
    /// extends it when larger.
    pub fn new(requests_per_second: f64, crawl_delay: Option<Duration>) -> Self {
        let base = Duration::from_secs_f64(1.0 / requests_per_second.max(0.001));
        let interval = match crawl_delay {
            Some(delay) if delay > base => delay,
            _ => base,
        };
        Self {
            interval,
            last_request: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the next fetch may be dispatched. The first call returns
    /// immediately.
    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;
        let now = Instant::now();
        match *last {
            None => {
                *last = Some(now);
            }
            Some(prev) => {
                let elapsed = now.duration_since(prev);
                if elapsed < self.interval {
                    tokio::time::sleep(self.interval - elapsed).await;
                }
                *last = Some(Instant::now());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crawl_delay_extends_base_interval() {
        let limiter = RateLimiter::new(2.0, Some(Duration::from_secs(3)));
        assert_eq!(limiter.interval(), Duration::from_secs(3));
    }

    #[test]
    fn short_crawl_delay_does_not_shrink_interval() {
        let limiter = RateLimiter::new(2.0, Some(Duration::from_millis(100)));
        assert_eq!(limiter.interval(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn waits_enforce_spacing() {
        let limiter = RateLimiter::new(10.0, None);
        let start = Instant::now();
        limiter.wait().await;
        limiter.wait().await;
        limiter.wait().await;
        // Two enforced gaps of 100ms after the free first call
        assert!(start.elapsed() >= Duration::from_millis(200));
    }
}
