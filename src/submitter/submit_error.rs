use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The browser could not be started.
    Launch(String),
    ElementNotFound(String),
    WaitTimeout(String),
    /// An element went away between lookup and use, usually after a page transition.
    StaleElement(String),
    /// Any other browser-side failure scoped to the current page.
    Browser(String),
    /// The browser itself is gone; nothing else can be submitted.
    Session(String),
}

impl SubmitError {
    /// Fatal errors end the batch; everything else only ends the attempt.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SubmitError::Launch(_) | SubmitError::Session(_))
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Launch(msg) => write!(f, "Failed to launch browser: {msg}"),
            SubmitError::ElementNotFound(msg) => write!(f, "Element not found: {msg}"),
            SubmitError::WaitTimeout(msg) => write!(f, "Timed out waiting for {msg}"),
            SubmitError::StaleElement(msg) => write!(f, "Stale element: {msg}"),
            SubmitError::Browser(msg) => write!(f, "Browser error: {msg}"),
            SubmitError::Session(msg) => write!(f, "Browser session lost: {msg}"),
        }
    }
}

impl Error for SubmitError {}
