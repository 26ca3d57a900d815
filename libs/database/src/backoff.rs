//! Doubling delays between startup connection attempts

use std::fmt::Display;
use std::time::Duration;
use tracing::warn;

/// How many times to try and how long to wait in between
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Backoff {
    /// Total attempts, the first one included
    pub attempts: u32,
    pub first_delay: Duration,
    pub max_delay: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            attempts: 6,
            first_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl Backoff {
    pub fn attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    pub fn first_delay(mut self, delay: Duration) -> Self {
        self.first_delay = delay;
        self
    }

    /// Sleep before each retry; one entry fewer than `attempts`.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.attempts.saturating_sub(1)).map(|n| {
            self.first_delay
                .saturating_mul(2u32.saturating_pow(n))
                .min(self.max_delay)
        })
    }
}

/// Run `op` until it succeeds or the attempts run out.
/// Returns the last error with the number of attempts made.
pub async fn retry<F, Fut, T, E>(backoff: Backoff, what: &str, mut op: F) -> Result<T, (u32, E)>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut delays = backoff.delays();
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => match delays.next() {
                Some(delay) => {
                    warn!(%err, attempt, ?delay, "{what} failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => return Err((attempt, err)),
            },
        }
    }
}
