//! Retry policy and response evaluation
//!
//! A [`RetryPolicy`] says how many attempts a request gets and how long to
//! wait between them. A [`ResponseEvaluator`] looks at each reply and decides
//! whether it is good enough to hand back or should be reissued.
//!
//! Back-off schedule with the defaults (100 ms base, factor 2, 30 s cap):
//!
//! | After attempt | Sleep   |
//! |---------------|---------|
//! | 1             | 100 ms  |
//! | 2             | 200 ms  |
//! | 3             | 400 ms  |

use crate::http::{Reply, Session};
use crate::RelayError;
use async_trait::async_trait;
use std::time::Duration;

/// Outcome of evaluating one reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Hand the reply back to the caller
    Accept,
    /// Reissue the request if attempts remain
    Retry,
}

/// Strategy deciding whether a reply should be retried
///
/// Evaluators receive the reply and the session it came from. They may read
/// the body (it is buffered for the caller afterwards) and may mutate
/// session state such as cookies. An `Err` is treated as [`Verdict::Retry`].
#[async_trait]
pub trait ResponseEvaluator: Send + Sync {
    /// Evaluates one reply
    async fn evaluate(&self, reply: &mut Reply, session: &Session) -> Result<Verdict, RelayError>;
}

/// Evaluator that accepts every reply
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAll;

#[async_trait]
impl ResponseEvaluator for AcceptAll {
    async fn evaluate(&self, _reply: &mut Reply, _session: &Session) -> Result<Verdict, RelayError> {
        Ok(Verdict::Accept)
    }
}

/// Attempt ceiling and exponential back-off settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub attempts: u32,

    /// Delay after the first failed attempt
    pub base_delay: Duration,

    /// Growth factor applied per further attempt
    pub factor: f64,

    /// Upper bound for a single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_millis(100),
            factor: 2.0,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with `attempts` total attempts and default back-off
    pub fn new(attempts: u32) -> Self {
        Self {
            attempts,
            ..Self::default()
        }
    }

    /// Replaces the base delay
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Attempt ceiling, never below one
    pub fn max_attempts(&self) -> u32 {
        self.attempts.max(1)
    }

    /// Delay to wait after the given (1-based) failed attempt
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(30) as i32;
        let secs = self.base_delay.as_secs_f64() * self.factor.powi(exponent);
        let capped = secs.min(self.max_delay.as_secs_f64());
        if capped.is_finite() && capped > 0.0 {
            Duration::from_secs_f64(capped)
        } else {
            Duration::ZERO
        }
    }
}
