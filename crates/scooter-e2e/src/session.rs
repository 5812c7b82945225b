// Session - one live browser shared by every page handle
//
// Page handles clone the Session; none of them owns the browser. The wait
// horizon lives here so that set_timeout() reaches every handle at once.
// Teardown quits the driver exactly once, after which every page operation
// fails with InvalidState.

use crate::config::SuiteConfig;
use crate::driver::Driver;
use crate::error::{Error, Result};
use crate::pages::LandingPage;
use crate::selector::Selector;
use crate::wait::{Condition, Outcome, WaitSpec};
use futures_util::FutureExt;
use parking_lot::RwLock;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Handle to the browser session of one test
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    driver: Arc<dyn Driver>,
    base_url: String,
    timeout: RwLock<Duration>,
    poll_interval: Duration,
    closed: AtomicBool,
    order_in_progress: AtomicBool,
    // Set once the notice was accepted; the consent cookie keeps it away after that
    cookie_notice_accepted: AtomicBool,
}

impl Session {
    pub fn new(driver: Arc<dyn Driver>, config: &SuiteConfig) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                driver,
                base_url: config.base_url.clone(),
                timeout: RwLock::new(config.timeout()),
                poll_interval: config.poll_interval(),
                closed: AtomicBool::new(false),
                order_in_progress: AtomicBool::new(false),
                cookie_notice_accepted: AtomicBool::new(false),
            }),
        }
    }

    /// Runs `body` with a fresh session and tears it down afterwards.
    ///
    /// Teardown runs whether `body` succeeds, fails or panics; a panic is
    /// resumed once the browser has been closed. An error from `body` takes
    /// precedence over a teardown error.
    pub async fn scoped<F, Fut, T>(driver: Arc<dyn Driver>, config: &SuiteConfig, body: F) -> Result<T>
    where
        F: FnOnce(Session) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let session = Session::new(driver, config);
        let outcome = AssertUnwindSafe(body(session.clone())).catch_unwind().await;
        let teardown = session.close().await;

        match outcome {
            Ok(Ok(value)) => teardown.map(|()| value),
            Ok(Err(e)) => {
                if let Err(close_err) = teardown {
                    tracing::warn!("Session teardown failed after test error: {}", close_err);
                }
                Err(e)
            }
            Err(panic) => {
                if let Err(close_err) = teardown {
                    tracing::warn!("Session teardown failed after panic: {}", close_err);
                }
                std::panic::resume_unwind(panic)
            }
        }
    }

    /// The driver, unless the session has been closed.
    pub fn driver(&self) -> Result<&dyn Driver> {
        if self.is_closed() {
            return Err(Error::InvalidState(
                "session has been closed; open a new one".to_string(),
            ));
        }
        Ok(self.inner.driver.as_ref())
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Current wait horizon.
    pub fn timeout(&self) -> Duration {
        *self.inner.timeout.read()
    }

    /// Changes the wait horizon for every subsequent wait in this session.
    pub fn set_timeout(&self, timeout: Duration) -> Result<()> {
        if timeout.is_zero() {
            return Err(Error::InvalidArgument(
                "timeout must be positive".to_string(),
            ));
        }
        *self.inner.timeout.write() = timeout;
        tracing::debug!("Session wait horizon set to {:?}", timeout);
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        self.inner.poll_interval
    }

    /// Wait spec using the session's current horizon.
    pub fn wait_for(&self, selector: Selector, condition: Condition) -> WaitSpec {
        WaitSpec::new(selector, condition, self.timeout()).with_poll_interval(self.poll_interval())
    }

    /// Navigates to the base URL and dismisses the cookie notice.
    ///
    /// Once the notice has been accepted in this session it is not looked for
    /// again.
    pub async fn open_landing(&self) -> Result<LandingPage> {
        tracing::info!("Opening {}", self.base_url());
        self.driver()?.goto(self.base_url()).await?;
        let landing = LandingPage::new(self.clone());
        if !self.inner.cookie_notice_accepted.load(Ordering::Acquire)
            && landing.dismiss_cookie_notice().await == Outcome::Shown
        {
            self.inner
                .cookie_notice_accepted
                .store(true, Ordering::Release);
        }
        Ok(landing)
    }

    /// Landing handle for whatever page the browser currently shows.
    pub fn landing(&self) -> LandingPage {
        LandingPage::new(self.clone())
    }

    /// Marks an order flow as running until the guard is dropped.
    pub(crate) fn begin_order(&self) -> Result<OrderFlowGuard> {
        if self
            .inner
            .order_in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::InvalidState(
                "an order flow is already in progress in this session".to_string(),
            ));
        }
        Ok(OrderFlowGuard {
            session: self.clone(),
        })
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Quits the browser. Calling it again is a no-op.
    pub async fn close(&self) -> Result<()> {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        tracing::debug!("Closing browser session");
        self.inner.driver.quit().await
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.inner.base_url)
            .field("timeout", &self.timeout())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Clears the session's "order in progress" flag when dropped
pub(crate) struct OrderFlowGuard {
    session: Session,
}

impl Drop for OrderFlowGuard {
    fn drop(&mut self) {
        self.session
            .inner
            .order_in_progress
            .store(false, Ordering::Release);
    }
}
