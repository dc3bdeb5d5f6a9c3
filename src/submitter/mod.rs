mod chrome;
mod form;
mod retry;
mod session;
mod submit_error;

pub use chrome::ChromeLauncher;
pub use form::{FormSubmitter, SubmissionReport, SubmissionState};
pub use retry::RetryPolicy;
pub use session::{with_session, BrowserSession, SessionLauncher};
pub use submit_error::SubmitError;
