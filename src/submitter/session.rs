// submitter/session.rs
use crate::submitter::SubmitError;
use tracing::{error, info};

/// The handful of browser operations a form submission needs.
///
/// Elements are addressed by selector (and position among the matches) on
/// every call, so no element handle outlives a page transition.
pub trait BrowserSession {
    fn navigate(&mut self, url: &str) -> Result<(), SubmitError>;
    fn count_elements(&mut self, selector: &str) -> Result<usize, SubmitError>;
    fn type_into(&mut self, selector: &str, index: usize, text: &str) -> Result<(), SubmitError>;
    fn click(&mut self, selector: &str) -> Result<(), SubmitError>;
    fn current_url(&mut self) -> Result<String, SubmitError>;
    /// Shuts the browser down. Called once, by `SessionGuard`.
    fn close(&mut self) -> Result<(), SubmitError>;
}

pub trait SessionLauncher {
    type Session: BrowserSession;

    fn launch(&self) -> Result<Self::Session, SubmitError>;
}

/// Owns a live session and closes it exactly once: on `finish`, or on drop
/// if `finish` was never reached (early return, panic unwinding).
pub struct SessionGuard<S: BrowserSession> {
    session: S,
    closed: bool,
}

impl<S: BrowserSession> SessionGuard<S> {
    pub fn new(session: S) -> Self {
        Self {
            session,
            closed: false,
        }
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    pub fn finish(mut self) -> Result<(), SubmitError> {
        self.release()
    }

    fn release(&mut self) -> Result<(), SubmitError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        info!("Closing browser session");
        self.session.close()
    }
}

impl<S: BrowserSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            error!("❌ Error closing browser: {e}");
        }
    }
}

/// Launches a session, runs `f` with it and always closes it afterwards.
///
/// A failure to close is logged, not returned: whatever `f` produced is
/// already final by then.
pub fn with_session<L, F, T>(launcher: &L, f: F) -> Result<T, SubmitError>
where
    L: SessionLauncher,
    F: FnOnce(&mut L::Session) -> T,
{
    let session = launcher.launch().map_err(|e| {
        error!("❌ Failed to set up browser: {e}");
        e
    })?;

    let mut guard = SessionGuard::new(session);
    let out = f(guard.session_mut());

    if let Err(e) = guard.finish() {
        error!("❌ Error closing browser: {e}");
    }

    Ok(out)
}
