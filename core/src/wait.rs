//! Bounded wait for the server to come up.
//!
//! The probe is a caller-supplied closure so the same loop drives a real
//! HTTP transport in the client and a scripted sequence in tests. Between
//! failed probes the loop sleeps with exponential backoff, never past the
//! deadline.

use std::fmt::Display;
use std::thread;
use std::time::{Duration, Instant};

/// Exponential delay schedule between probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub initial: Duration,
    pub max: Duration,
    pub factor: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(50),
            max: Duration::from_secs(1),
            factor: 2,
        }
    }
}

impl Backoff {
    /// Delay to use after `attempt` failed probes (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let mut delay = self.initial;
        for _ in 1..attempt {
            delay = delay.saturating_mul(self.factor);
            if delay >= self.max {
                return self.max;
            }
        }
        delay.min(self.max)
    }
}

/// Outcome of [`wait_until_available`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available { attempts: u32 },
    TimedOut { attempts: u32 },
}

impl Availability {
    pub fn timed_out(&self) -> bool {
        matches!(self, Availability::TimedOut { .. })
    }
}

/// Probe until a 200 status is seen or `max_wait` elapses.
///
/// Probe errors and non-200 statuses are treated alike: logged and retried.
/// At least one probe is always made.
pub fn wait_until_available<P, E>(mut probe: P, max_wait: Duration, backoff: &Backoff) -> Availability
where
    P: FnMut() -> Result<u16, E>,
    E: Display,
{
    // `None` when `max_wait` reaches past what `Instant` can represent.
    let deadline = Instant::now().checked_add(max_wait);
    let mut attempts = 0;
    loop {
        attempts += 1;
        match probe() {
            Ok(200) => return Availability::Available { attempts },
            Ok(status) => tracing::debug!(attempts, status, "server not ready"),
            Err(err) => tracing::debug!(attempts, error = %err, "server unreachable"),
        }

        let delay = backoff.delay(attempts);
        match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    return Availability::TimedOut { attempts };
                }
                thread::sleep(delay.min(deadline - now));
            }
            None => thread::sleep(delay),
        }
    }
}
