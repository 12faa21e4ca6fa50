//! Request pacing with adaptive retry backoff.
//!
//! Every zone operation runs through a [`Pacer`]. One attempt performs one
//! request and classifies the outcome; the pacer owns all sleeping. The
//! sleep between retries doubles on every failure (bounded by a maximum)
//! and decays back toward the minimum while calls keep succeeding, so a
//! long run of rate-limit answers backs off hard without slowing the
//! common success path at all.

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tracing::trace;

/// How a single request attempt concluded.
#[derive(Debug)]
pub enum AttemptOutcome<T, E> {
    /// The attempt succeeded.
    Ok(T),
    /// The attempt failed and must not be retried.
    Fatal(E),
    /// The attempt failed and may be retried, optionally not before the
    /// hinted delay has elapsed.
    Retry {
        /// The failure that triggered the retry; surfaced verbatim if the
        /// attempt budget runs out.
        error: E,
        /// Lower bound for the next sleep, e.g. from a rate-limit signal.
        delay_hint: Option<Duration>,
    },
}

/// Tuning knobs for a [`Pacer`].
#[derive(Debug, Clone, Copy)]
pub struct PacerConfig {
    /// Smallest sleep between attempts, and the value the backoff state
    /// decays back to.
    pub min_sleep: Duration,
    /// Largest sleep between attempts.
    pub max_sleep: Duration,
    /// How quickly the sleep decays after successes: the excess over
    /// `min_sleep` is halved this many times per successful call.
    pub decay_constant: u32,
    /// Maximum number of attempts for one logical call.
    pub max_attempts: u32,
}

impl Default for PacerConfig {
    fn default() -> Self {
        Self {
            min_sleep: Duration::from_millis(10),
            max_sleep: Duration::from_secs(60),
            decay_constant: 1,
            max_attempts: 10,
        }
    }
}

/// Adaptive retry scheduler shared by all operations of one client.
#[derive(Debug)]
pub struct Pacer {
    config: PacerConfig,
    /// Sleep applied to the next retry.
    sleep: Mutex<Duration>,
}

impl Pacer {
    /// Create a pacer with the given configuration.
    #[must_use]
    pub fn new(config: PacerConfig) -> Self {
        Self {
            sleep: Mutex::new(config.min_sleep),
            config,
        }
    }

    /// Run `attempt` until it succeeds, fails fatally, or the attempt
    /// budget is exhausted.
    ///
    /// `attempt` must perform exactly one request per invocation. Dropping
    /// the returned future cancels both the in-flight attempt and any
    /// pending backoff sleep.
    pub async fn call<T, E, F, Fut>(&self, mut attempt: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AttemptOutcome<T, E>>,
    {
        let mut attempts = 0;
        loop {
            match attempt().await {
                AttemptOutcome::Ok(value) => {
                    self.note_success();
                    return Ok(value);
                }
                AttemptOutcome::Fatal(error) => return Err(error),
                AttemptOutcome::Retry { error, delay_hint } => {
                    attempts += 1;
                    if attempts >= self.config.max_attempts {
                        return Err(error);
                    }
                    let delay = self.next_delay(delay_hint);
                    trace!(attempt = attempts, ?delay, "retrying after backoff");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Compute the sleep for the upcoming retry and advance the backoff
    /// state.
    fn next_delay(&self, hint: Option<Duration>) -> Duration {
        let mut sleep = self.sleep.lock().unwrap_or_else(PoisonError::into_inner);
        let current = (*sleep).clamp(self.config.min_sleep, self.config.max_sleep);
        *sleep = (current * 2).min(self.config.max_sleep);
        match hint {
            Some(hint) => current.max(hint).min(self.config.max_sleep),
            None => current,
        }
    }

    /// Decay the backoff state after a successful call.
    fn note_success(&self) {
        let mut sleep = self.sleep.lock().unwrap_or_else(PoisonError::into_inner);
        let mut excess = sleep.saturating_sub(self.config.min_sleep);
        for _ in 0..self.config.decay_constant {
            excess /= 2;
        }
        *sleep = self.config.min_sleep + excess;
    }
}
