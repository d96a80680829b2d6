//! Token bucket admission for outbound calls.
//!
//! Every request made through a [`Connection`](crate::Connection) passes
//! through its [`RateGate`] before a socket is opened. The API enforces a
//! daily quota per application, so the gate is the only thing standing
//! between a busy caller and a locked-out key.

use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

use crate::error::ConfigError;

/// Seconds in a day, for converting daily quotas.
const SECS_PER_DAY: f64 = 24.0 * 60.0 * 60.0;

/// Longest single wait. Waits at very slow rates are clamped to it.
const MAX_WAIT: Duration = Duration::from_secs(30 * 365 * 24 * 60 * 60);

/// How fast calls may be made.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RateLimit {
    /// Every call is admitted immediately.
    #[default]
    Unlimited,
    /// A steady `rate` of calls per second, with up to `burst` admitted
    /// back to back.
    PerSecond { rate: f64, burst: u32 },
}

impl RateLimit {
    /// Spread a daily call quota evenly over 24 hours.
    ///
    /// ```
    /// use octranspo::RateLimit;
    ///
    /// let RateLimit::PerSecond { rate, burst } = RateLimit::daily(10_000) else {
    ///     unreachable!()
    /// };
    /// assert!(rate > 0.115 && rate < 0.116);
    /// assert_eq!(burst, 1);
    /// ```
    pub fn daily(calls_per_day: u32) -> Self {
        RateLimit::PerSecond {
            rate: f64::from(calls_per_day) / SECS_PER_DAY,
            burst: 1,
        }
    }
}

/// Mutable bucket state, guarded by the gate's mutex.
#[derive(Debug)]
struct Bucket {
    rate: f64,
    burst: f64,
    /// Available tokens as of `last`. Negative while callers are queued.
    tokens: f64,
    /// When `tokens` was last brought up to date.
    last: Instant,
    /// Latest time any reservation is allowed to proceed.
    last_event: Instant,
}

impl Bucket {
    /// Time to accrue `tokens`, capped at [`MAX_WAIT`].
    fn time_for(&self, tokens: f64) -> Duration {
        Duration::try_from_secs_f64(tokens / self.rate).map_or(MAX_WAIT, |d| d.min(MAX_WAIT))
    }

    fn advance(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.rate).min(self.burst);
        self.last = now.max(self.last);
    }

    fn reserve(&mut self, now: Instant) -> Instant {
        self.advance(now);
        self.tokens -= 1.0;
        let ready_at = if self.tokens < 0.0 {
            now + self.time_for(-self.tokens)
        } else {
            now
        };
        self.last_event = ready_at;
        ready_at
    }

    /// Give back a reservation that will never be used.
    ///
    /// Later reservations were priced assuming this one would run, so only
    /// the portion not already spoken for is restored.
    fn cancel(&mut self, ready_at: Instant, now: Instant) {
        if ready_at <= now {
            return;
        }
        let promised = self
            .last_event
            .saturating_duration_since(ready_at)
            .as_secs_f64()
            * self.rate;
        let restore = 1.0 - promised;
        if restore <= 0.0 {
            return;
        }
        self.advance(now);
        self.tokens = (self.tokens + restore).min(self.burst);
        if ready_at == self.last_event {
            let step = self.time_for(1.0);
            self.last_event = ready_at.checked_sub(step).unwrap_or(now);
        }
    }
}

/// Shared admission control for one connection.
///
/// Acquisition is cancel-safe: dropping the future returned by
/// [`acquire`](Self::acquire) before it completes hands the reserved slot
/// back.
#[derive(Debug)]
pub struct RateGate {
    bucket: Option<Mutex<Bucket>>,
}

impl RateGate {
    /// Build a gate, rejecting rates that are not finite and positive and
    /// bursts below one.
    pub fn new(limit: RateLimit) -> Result<Self, ConfigError> {
        match limit {
            RateLimit::Unlimited => Ok(Self::unlimited()),
            RateLimit::PerSecond { rate, burst } => {
                if !rate.is_finite() || rate <= 0.0 {
                    return Err(ConfigError::InvalidRate(rate));
                }
                if burst == 0 {
                    return Err(ConfigError::InvalidBurst(burst));
                }
                let now = Instant::now();
                Ok(Self {
                    bucket: Some(Mutex::new(Bucket {
                        rate,
                        burst: f64::from(burst),
                        tokens: f64::from(burst),
                        last: now,
                        last_event: now,
                    })),
                })
            }
        }
    }

    /// A gate that never makes anyone wait.
    pub fn unlimited() -> Self {
        Self { bucket: None }
    }

    /// Whether this gate admits everything.
    pub fn is_unlimited(&self) -> bool {
        self.bucket.is_none()
    }

    /// Wait for a token.
    pub async fn acquire(&self) {
        let Some(bucket) = &self.bucket else {
            return;
        };

        let now = Instant::now();
        let ready_at = lock(bucket).reserve(now);
        let mut reservation = Reservation {
            bucket,
            ready_at,
            done: false,
        };

        if ready_at > now {
            trace!(wait_ms = (ready_at - now).as_millis() as u64, "rate gate wait");
            tokio::time::sleep_until(ready_at).await;
        }
        reservation.done = true;
    }
}

impl Default for RateGate {
    fn default() -> Self {
        Self::unlimited()
    }
}

fn lock(bucket: &Mutex<Bucket>) -> std::sync::MutexGuard<'_, Bucket> {
    // Poisoning is ignored: the bucket is plain numbers.
    bucket.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A slot taken from the bucket that is returned if the waiter goes away.
struct Reservation<'a> {
    bucket: &'a Mutex<Bucket>,
    ready_at: Instant,
    done: bool,
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if !self.done {
            lock(self.bucket).cancel(self.ready_at, Instant::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limited(rate: f64, burst: u32) -> RateGate {
        RateGate::new(RateLimit::PerSecond { rate, burst }).unwrap()
    }

    #[test]
    fn rejects_invalid_limits() {
        let err = RateGate::new(RateLimit::PerSecond {
            rate: 0.0,
            burst: 1,
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidRate(0.0));

        assert!(matches!(
            RateGate::new(RateLimit::PerSecond {
                rate: f64::NAN,
                burst: 1
            }),
            Err(ConfigError::InvalidRate(_))
        ));

        let err = RateGate::new(RateLimit::PerSecond {
            rate: 1.0,
            burst: 0,
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidBurst(0));
    }

    #[test]
    fn tiny_rates_cap_the_wait() {
        let now = Instant::now();
        let mut bucket = Bucket {
            rate: 1e-20,
            burst: 1.0,
            tokens: 1.0,
            last: now,
            last_event: now,
        };
        assert_eq!(bucket.reserve(now), now);
        assert_eq!(bucket.reserve(now), now + MAX_WAIT);

        // Returning the slot must not overflow either.
        bucket.cancel(now + MAX_WAIT, now);
        assert!(bucket.tokens <= 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn tiny_rate_waits_instead_of_failing() {
        let gate = limited(1e-20, 1);
        gate.acquire().await;

        let second = tokio::time::timeout(Duration::from_secs(3600), gate.acquire()).await;
        assert!(second.is_err());
    }

    #[test]
    fn default_is_unlimited() {
        assert!(RateGate::default().is_unlimited());
        assert!(RateGate::new(RateLimit::default()).unwrap().is_unlimited());
        assert!(!limited(1.0, 1).is_unlimited());
    }

    #[tokio::test(start_paused = true)]
    async fn unlimited_never_waits() {
        let gate = RateGate::unlimited();
        let start = Instant::now();
        for _ in 0..100 {
            gate.acquire().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn burst_is_immediate_then_steady() {
        let gate = limited(2.0, 3);
        let start = Instant::now();

        for _ in 0..3 {
            gate.acquire().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);

        gate.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(500));

        gate.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert!(start.elapsed() < Duration::from_millis(1100));
    }

    #[tokio::test(start_paused = true)]
    async fn bucket_refills_while_idle() {
        let gate = limited(1.0, 2);
        gate.acquire().await;
        gate.acquire().await;

        tokio::time::sleep(Duration::from_secs(10)).await;

        // Refill is capped at the burst size.
        let start = Instant::now();
        gate.acquire().await;
        gate.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
        gate.acquire().await;
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_waiters_are_spaced_by_rate() {
        let gate = std::sync::Arc::new(limited(10.0, 1));
        let start = Instant::now();

        let waiters = (0..5).map(|_| {
            let gate = gate.clone();
            tokio::spawn(async move {
                gate.acquire().await;
                Instant::now()
            })
        });
        let mut finished: Vec<Instant> = futures::future::join_all(waiters)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        finished.sort();

        assert!(finished[4] - start >= Duration::from_millis(400));
        for pair in finished.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(99));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_wait_returns_its_slot() {
        let gate = limited(1.0, 1);
        gate.acquire().await;

        // Next slot is a second away; give up after 100ms.
        let timed_out = tokio::time::timeout(Duration::from_millis(100), gate.acquire()).await;
        assert!(timed_out.is_err());

        // The abandoned reservation must not push the next caller out
        // to two seconds.
        let start = Instant::now();
        gate.acquire().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn separate_gates_do_not_share_quota() {
        let a = limited(1.0, 1);
        let b = limited(1.0, 1);
        let start = Instant::now();
        a.acquire().await;
        b.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
