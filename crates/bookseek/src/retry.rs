use std::time::Duration;

use log::warn;

use crate::Error;

/// How often a failing request is repeated and how long to wait in between.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub attempts: u32,
    /// Pause between two attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Calls `op` until it succeeds, fails with an error that is not retryable or the attempts
    /// run out. `op` receives the 1-based attempt number.
    ///
    /// # Errors
    ///
    /// The error of the last attempt is returned.
    pub(crate) fn run<T, F>(&self, mut op: F) -> Result<T, Error>
    where
        F: FnMut(u32) -> Result<T, Error>,
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;

        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < attempts => {
                    warn!("Attempt {attempt}/{attempts} failed: {err}");
                    pause(self.delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

pub(crate) fn pause(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}
