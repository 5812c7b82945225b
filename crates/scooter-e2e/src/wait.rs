// Wait primitives - locate, wait for a condition, act
//
// A WaitSpec pairs a selector with the condition it must reach and the horizon
// it may take. Resolution polls the driver until the condition holds or the
// horizon elapses.
//
// retry_on_stale() is the one recovery policy for DOM re-renders: resolve,
// act, and on a stale reference resolve and act exactly once more.

use crate::driver::{Driver, ElementRef};
use crate::error::{Error, Result};
use crate::selector::Selector;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Condition a selector has to reach before a wait returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// At least one element is attached to the document
    Present,
    /// An element is attached and rendered
    Visible,
    /// An element is rendered and enabled
    Clickable,
    /// At least one element is attached; every match is returned
    AllPresent,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Condition::Present => "be present",
            Condition::Visible => "be visible",
            Condition::Clickable => "be clickable",
            Condition::AllPresent => "all be present",
        })
    }
}

/// What a selector has to reach and how long it may take.
#[derive(Debug, Clone)]
pub struct WaitSpec {
    selector: Selector,
    condition: Condition,
    timeout: Duration,
    poll_interval: Duration,
}

impl WaitSpec {
    pub fn new(selector: Selector, condition: Condition, timeout: Duration) -> Self {
        Self {
            selector,
            condition,
            timeout,
            poll_interval: crate::config::DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn condition(&self) -> Condition {
        self.condition
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Evaluates the condition once.
    ///
    /// Returns the satisfying element(s), or an empty list when the condition
    /// does not hold yet. An element that goes stale while being inspected
    /// counts as "not yet".
    pub async fn probe(&self, driver: &dyn Driver) -> Result<Vec<ElementRef>> {
        let mut found = driver.find_all(&self.selector).await?;

        match self.condition {
            Condition::AllPresent => Ok(found),
            Condition::Present => {
                found.truncate(1);
                Ok(found)
            }
            Condition::Visible | Condition::Clickable => {
                for element in found {
                    match self.satisfied_by(driver, &element).await {
                        Ok(true) => return Ok(vec![element]),
                        Ok(false) => {}
                        Err(e) if e.is_stale() => {
                            tracing::debug!("{} went stale while probing, re-resolving", element);
                            return Ok(Vec::new());
                        }
                        Err(e) => return Err(e),
                    }
                }
                Ok(Vec::new())
            }
        }
    }

    async fn satisfied_by(&self, driver: &dyn Driver, element: &ElementRef) -> Result<bool> {
        if !driver.is_displayed(element).await? {
            return Ok(false);
        }
        if self.condition == Condition::Clickable {
            return driver.is_enabled(element).await;
        }
        Ok(true)
    }

    /// Polls until the condition holds and returns the matching element(s).
    ///
    /// # Errors
    ///
    /// `Error::Timeout` when the horizon elapses first; driver errors other
    /// than staleness propagate immediately.
    pub async fn resolve(&self, driver: &dyn Driver) -> Result<Vec<ElementRef>> {
        let start = Instant::now();

        loop {
            let found = self.probe(driver).await?;
            if !found.is_empty() {
                tracing::debug!(
                    "{} reached '{}' after {:?}",
                    self.selector,
                    self.condition,
                    start.elapsed()
                );
                return Ok(found);
            }

            if start.elapsed() >= self.timeout {
                return Err(Error::Timeout {
                    what: format!("{} to {}", self.selector, self.condition),
                    timeout_ms: self.timeout.as_millis() as u64,
                });
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Like [`resolve`](Self::resolve) but returns only the first element.
    pub async fn resolve_one(&self, driver: &dyn Driver) -> Result<ElementRef> {
        let mut found = self.resolve(driver).await?;
        // resolve() never returns an empty list
        Ok(found.swap_remove(0))
    }

    /// Waits for an indicator and reports what was observed instead of failing.
    pub async fn observe(&self, driver: &dyn Driver) -> Outcome {
        match self.resolve(driver).await {
            Ok(_) => Outcome::Shown,
            Err(e) if e.is_timeout() => match self.probe(driver).await {
                Ok(found) if found.is_empty() => Outcome::NotShown,
                Ok(_) => Outcome::Shown,
                Err(probe_err) => {
                    tracing::warn!("Final probe of {} failed: {}", self.selector, probe_err);
                    Outcome::Unknown
                }
            },
            Err(e) => {
                tracing::warn!("Waiting for {} failed: {}", self.selector, e);
                Outcome::Unknown
            }
        }
    }
}

/// Result of waiting for an indicator whose absence is a legitimate answer.
///
/// `NotShown` means the horizon elapsed and a final look confirmed the
/// indicator absent or hidden. `Unknown` means the page could not be observed
/// at all. Both read as `false` where only a boolean is wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Shown,
    NotShown,
    Unknown,
}

impl Outcome {
    pub fn is_shown(&self) -> bool {
        matches!(self, Outcome::Shown)
    }
}

impl From<bool> for Outcome {
    fn from(shown: bool) -> Self {
        if shown {
            Outcome::Shown
        } else {
            Outcome::NotShown
        }
    }
}

impl From<Outcome> for bool {
    fn from(outcome: Outcome) -> Self {
        outcome.is_shown()
    }
}

/// Runs `act` on a freshly resolved element, re-resolving once on staleness.
///
/// `resolve` is called at most twice and `act` at most twice. A second stale
/// reference is returned with `what` as context; every other error is returned
/// as soon as it occurs.
pub async fn retry_on_stale<T, R, RFut, A, AFut>(what: &str, mut resolve: R, mut act: A) -> Result<T>
where
    R: FnMut() -> RFut,
    RFut: Future<Output = Result<ElementRef>>,
    A: FnMut(ElementRef) -> AFut,
    AFut: Future<Output = Result<T>>,
{
    let element = resolve().await?;
    match act(element).await {
        Err(e) if e.is_stale() => {
            tracing::debug!("{}: element went stale ({}), re-resolving once", what, e);
        }
        other => return other,
    }

    let element = resolve().await?;
    act(element).await.map_err(|e| {
        if e.is_stale() {
            e.context(format!("{} (still stale after re-resolving)", what))
        } else {
            e
        }
    })
}

/// Polls `probe` until it reports true or `timeout` elapses.
pub async fn poll_until<F, Fut>(what: &str, timeout: Duration, interval: Duration, mut probe: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let start = Instant::now();

    loop {
        if probe().await? {
            return Ok(());
        }

        if start.elapsed() >= timeout {
            return Err(Error::Timeout {
                what: what.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            });
        }

        tokio::time::sleep(interval).await;
    }
}
