// submitter/form.rs
use crate::config::FormConfig;
use crate::domain::PropertyRecord;
use crate::submitter::{with_session, BrowserSession, SessionLauncher, SubmitError};
use chrono::{DateTime, Utc};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Where a record stands in the submission loop.
///
/// `Pending -> Attempting(n) -> Submitted | Failed`. Records never reached
/// because the session died stay `Pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Pending,
    Attempting(u32),
    Submitted { attempts: u32 },
    Failed { attempts: u32, error: SubmitError },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    pub address: String,
    pub state: SubmissionState,
}

#[derive(Debug)]
pub struct SubmissionReport {
    pub outcomes: Vec<RecordOutcome>,
    /// Set when a session-level failure cut the batch short.
    pub aborted: Option<SubmitError>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SubmissionReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn successful(&self) -> usize {
        self.count(|s| matches!(s, SubmissionState::Submitted { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, SubmissionState::Failed { .. }))
    }

    pub fn pending(&self) -> usize {
        self.count(|s| matches!(s, SubmissionState::Pending))
    }

    fn count(&self, pred: impl Fn(&SubmissionState) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.state)).count()
    }
}

/// Fills the configured form once per record.
pub struct FormSubmitter {
    config: FormConfig,
}

impl FormSubmitter {
    pub fn new(config: FormConfig) -> Self {
        info!("Initializing form submitter for {}", config.url);
        Self { config }
    }

    /// Runs the whole batch inside one browser session.
    ///
    /// Only a launch failure is returned as an error; per-record failures and
    /// a lost session are reported in the `SubmissionReport`.
    pub fn submit_all<L: SessionLauncher>(
        &self,
        launcher: &L,
        records: &[PropertyRecord],
    ) -> Result<SubmissionReport, SubmitError> {
        with_session(launcher, |session| self.run_batch(session, records))
    }

    pub fn run_batch<S: BrowserSession>(
        &self,
        session: &mut S,
        records: &[PropertyRecord],
    ) -> SubmissionReport {
        let started_at = Utc::now();
        let total = records.len();

        let mut outcomes: Vec<RecordOutcome> = records
            .iter()
            .map(|r| RecordOutcome {
                address: r.address.clone(),
                state: SubmissionState::Pending,
            })
            .collect();
        let mut aborted = None;

        for (i, record) in records.iter().enumerate() {
            info!("Processing property {}/{}", i + 1, total);

            match self.submit_record(session, record) {
                Ok(state) => outcomes[i].state = state,
                Err(fatal) => {
                    error!("❌ Browser session failed, abandoning remaining records: {fatal}");
                    aborted = Some(fatal);
                    break;
                }
            }

            if i + 1 < total {
                pause(self.config.record_pause);
            }
        }

        let report = SubmissionReport {
            outcomes,
            aborted,
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            "Completed submissions: {}/{} successful in {}s",
            report.successful(),
            report.total(),
            (report.finished_at - report.started_at).num_seconds()
        );
        report
    }

    /// Drives one record to `Submitted` or `Failed`. `Err` means the session
    /// is gone and the batch has to stop.
    pub fn submit_record<S: BrowserSession>(
        &self,
        session: &mut S,
        record: &PropertyRecord,
    ) -> Result<SubmissionState, SubmitError> {
        let policy = &self.config.retry;
        let max = policy.attempts();
        let mut state = SubmissionState::Pending;

        info!("Submitting property: {}", record.address);

        loop {
            let attempt = match state {
                SubmissionState::Pending => 1,
                SubmissionState::Attempting(n) => n + 1,
                done => return Ok(done),
            };
            state = SubmissionState::Attempting(attempt);

            match self.attempt(session, record) {
                Ok(()) => {
                    info!("Form submitted successfully");
                    state = SubmissionState::Submitted { attempts: attempt };
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!("⚠️ Submission failed, attempt {attempt}/{max}: {e}");

                    if attempt >= max {
                        error!("❌ Giving up on {} after {attempt} attempts", record.address);
                        state = SubmissionState::Failed {
                            attempts: attempt,
                            error: e,
                        };
                    } else {
                        pause(policy.delay_before_retry(attempt));
                    }
                }
            }
        }
    }

    /// One navigate-fill-submit-verify cycle, always from a fresh page load.
    fn attempt<S: BrowserSession>(
        &self,
        session: &mut S,
        record: &PropertyRecord,
    ) -> Result<(), SubmitError> {
        let cfg = &self.config;

        session.navigate(&cfg.url)?;
        self.wait_for_inputs(session)?;

        for (index, field) in cfg.field_order.iter().enumerate() {
            session.type_into(&cfg.input_selector, index, record.field(*field))?;
            pause(cfg.input_pause);
        }

        session.click(&cfg.submit_selector)?;
        self.wait_for_confirmation(session)
    }

    fn wait_for_inputs<S: BrowserSession>(&self, session: &mut S) -> Result<(), SubmitError> {
        let cfg = &self.config;
        let needed = cfg.field_order.len();
        let mut found = 0;

        let ready = poll_until(cfg.element_timeout, cfg.poll_interval, || {
            found = session.count_elements(&cfg.input_selector)?;
            Ok(found >= needed)
        })?;

        if ready {
            Ok(())
        } else {
            Err(SubmitError::WaitTimeout(format!(
                "form inputs: expected at least {needed}, found {found}"
            )))
        }
    }

    fn wait_for_confirmation<S: BrowserSession>(&self, session: &mut S) -> Result<(), SubmitError> {
        let cfg = &self.config;
        let mut last_url = String::new();

        let confirmed = poll_until(cfg.confirmation_timeout, cfg.poll_interval, || {
            last_url = session.current_url()?;
            Ok(last_url.contains(&cfg.confirmation_marker))
        })?;

        if confirmed {
            Ok(())
        } else {
            Err(SubmitError::WaitTimeout(format!(
                "submission confirmation (still at {last_url})"
            )))
        }
    }
}

/// Calls `check` until it returns true or `timeout` runs out. Always checks
/// at least once.
fn poll_until<F>(timeout: Duration, interval: Duration, mut check: F) -> Result<bool, SubmitError>
where
    F: FnMut() -> Result<bool, SubmitError>,
{
    let deadline = Instant::now() + timeout;

    loop {
        if check()? {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        pause(interval);
    }
}

fn pause(d: Duration) {
    if !d.is_zero() {
        thread::sleep(d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submitter::RetryPolicy;
    use crate::tests::utils::{instant_form_config, FakeBrowser, FakeLauncher, Step};

    fn record(n: u32) -> PropertyRecord {
        PropertyRecord::new(format!("${n}00,000"), format!("{n} Main St"), format!("L{n}"))
    }

    #[test]
    fn fills_fields_in_configured_order() {
        let browser = FakeBrowser::accepting();
        let submitter = FormSubmitter::new(instant_form_config());

        let state = submitter
            .submit_record(&mut browser.clone(), &record(1))
            .unwrap();

        assert_eq!(state, SubmissionState::Submitted { attempts: 1 });
        assert_eq!(
            browser.submissions(),
            vec![vec!["L1".to_string(), "$100,000".to_string(), "1 Main St".to_string()]]
        );
    }

    #[test]
    fn succeeds_on_a_later_attempt() {
        let browser = FakeBrowser::scripted(vec![Step::NoConfirmation, Step::Accept]);
        let submitter = FormSubmitter::new(instant_form_config());

        let state = submitter
            .submit_record(&mut browser.clone(), &record(1))
            .unwrap();

        assert_eq!(state, SubmissionState::Submitted { attempts: 2 });
        assert_eq!(browser.navigations(), 2);
    }

    #[test]
    fn gives_up_after_exactly_max_attempts() {
        let browser = FakeBrowser::scripted(vec![
            Step::MissingSubmit,
            Step::FewInputs,
            Step::NoConfirmation,
            Step::Accept,
        ]);
        let submitter = FormSubmitter::new(instant_form_config());

        let state = submitter
            .submit_record(&mut browser.clone(), &record(1))
            .unwrap();

        match state {
            SubmissionState::Failed { attempts, error } => {
                assert_eq!(attempts, 3);
                assert!(matches!(error, SubmitError::WaitTimeout(_)));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
        assert_eq!(browser.navigations(), 3);
        assert!(browser.submissions().is_empty());
    }

    #[test]
    fn zero_attempt_budget_still_tries_once() {
        let browser = FakeBrowser::scripted(vec![Step::FewInputs]);
        let mut config = instant_form_config();
        config.retry = RetryPolicy::immediate(0);

        let state = FormSubmitter::new(config)
            .submit_record(&mut browser.clone(), &record(1))
            .unwrap();

        assert!(matches!(state, SubmissionState::Failed { attempts: 1, .. }));
        assert_eq!(browser.navigations(), 1);
    }

    #[test]
    fn failed_record_does_not_stop_the_batch() {
        let browser = FakeBrowser::scripted(vec![
            Step::MissingSubmit,
            Step::MissingSubmit,
            Step::MissingSubmit,
        ]);
        let launcher = FakeLauncher::new(browser.clone());
        let submitter = FormSubmitter::new(instant_form_config());

        let report = submitter
            .submit_all(&launcher, &[record(1), record(2), record(3)])
            .unwrap();

        assert_eq!(report.total(), 3);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.successful(), 2);
        assert!(report.aborted.is_none());
        assert_eq!(browser.navigations(), 5);
        assert_eq!(browser.closes(), 1);
    }

    #[test]
    fn lost_session_stops_the_batch_and_still_closes() {
        let browser = FakeBrowser::scripted(vec![Step::Accept, Step::Crash]);
        let launcher = FakeLauncher::new(browser.clone());
        let submitter = FormSubmitter::new(instant_form_config());

        let report = submitter
            .submit_all(&launcher, &[record(1), record(2), record(3)])
            .unwrap();

        assert_eq!(report.successful(), 1);
        assert_eq!(report.pending(), 2);
        assert!(matches!(report.aborted, Some(SubmitError::Session(_))));
        assert_eq!(browser.navigations(), 2);
        assert_eq!(browser.closes(), 1);
    }

    #[test]
    fn launch_failure_is_returned() {
        let browser = FakeBrowser::accepting();
        let launcher = FakeLauncher::failing(browser.clone());
        let submitter = FormSubmitter::new(instant_form_config());

        let err = submitter.submit_all(&launcher, &[record(1)]).unwrap_err();

        assert!(err.is_fatal());
        assert_eq!(browser.navigations(), 0);
    }

    #[test]
    fn poll_until_checks_at_least_once() {
        let mut calls = 0;
        let ok = poll_until(Duration::ZERO, Duration::ZERO, || {
            calls += 1;
            Ok(false)
        })
        .unwrap();

        assert!(!ok);
        assert_eq!(calls, 1);
    }
}
