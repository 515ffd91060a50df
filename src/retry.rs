use std::thread;
use std::time::Duration;

use log::warn;

use crate::error::{Error, Result};

/// Fixed-delay bounded retry.
///
/// A request is tried up to `max_attempts` times, sleeping `delay` between
/// attempts. Errors that [`Error::is_retryable`] rejects are returned at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl Default for RetryPolicy {
    /// Five attempts, fifteen minutes apart: one full rate-limit window.
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 5,
            delay: Duration::from_secs(15 * 60),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        RetryPolicy {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn run<T, F>(&self, operation: &str, mut attempt: F) -> Result<T>
    where
        F: FnMut() -> Result<T>,
    {
        let max_attempts = self.max_attempts;
        let mut tries = 0;
        loop {
            tries += 1;
            let err = match attempt() {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => err,
            };

            if tries >= max_attempts {
                return Err(Error::RetriesExhausted {
                    operation: operation.to_string(),
                    attempts: tries,
                    last: Box::new(err),
                });
            }

            warn!(
                "{operation}: attempt {tries}/{max_attempts} failed ({err}); sleeping {}s",
                self.delay.as_secs()
            );
            if !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate_limited() -> Error {
        Error::Api {
            status: 429,
            body: "Rate limit exceeded".into(),
        }
    }

    #[test]
    fn returns_first_success() {
        let policy = RetryPolicy::new(5, Duration::ZERO);
        let mut calls = 0;
        let value = policy
            .run("lookup", || {
                calls += 1;
                if calls < 3 { Err(rate_limited()) } else { Ok(calls) }
            })
            .unwrap();
        assert_eq!(value, 3);
        assert_eq!(calls, 3);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let policy = RetryPolicy::new(4, Duration::ZERO);
        let mut calls = 0;
        let err = policy
            .run("friends/ids for x", || -> Result<()> {
                calls += 1;
                Err(rate_limited())
            })
            .unwrap_err();
        assert_eq!(calls, 4);
        match err {
            Error::RetriesExhausted {
                operation,
                attempts,
                last,
            } => {
                assert_eq!(operation, "friends/ids for x");
                assert_eq!(attempts, 4);
                assert!(matches!(*last, Error::Api { status: 429, .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn final_errors_are_not_retried() {
        let policy = RetryPolicy::new(5, Duration::ZERO);
        let mut calls = 0;
        let err = policy
            .run("lookup", || -> Result<()> {
                calls += 1;
                Err(Error::Api {
                    status: 401,
                    body: "Unauthorized".into(),
                })
            })
            .unwrap_err();
        assert_eq!(calls, 1);
        assert!(matches!(err, Error::Api { status: 401, .. }));
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(policy.run("noop", || Ok(1)).unwrap(), 1);
    }
}
