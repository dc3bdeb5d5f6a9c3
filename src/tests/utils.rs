// src/tests/utils.rs
use crate::config::FormConfig;
use crate::scraper::{PageSource, ScraperError};
use crate::submitter::{BrowserSession, RetryPolicy, SessionLauncher, SubmitError};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One `<li>` card shaped like the listing site's markup. `None` leaves the
/// sub-element out entirely.
pub fn listing_card(price: Option<&str>, address: Option<&str>, link: Option<&str>) -> String {
    let mut inner = String::new();

    if let Some(link) = link {
        inner.push_str(&format!(r#"<a class="property-card-link" href="{link}">"#));
    } else {
        inner.push_str("<a>");
    }
    if let Some(address) = address {
        inner.push_str(&format!("<address>\n  {address} \n</address>"));
    }
    inner.push_str("</a>");

    if let Some(price) = price {
        inner.push_str(&format!(
            r#"<div><span class="PropertyCardWrapper__StyledPriceLine">{price}</span></div>"#
        ));
    }

    format!(r#"<li class="ListItem-c11n-8-84-3-StyledListCardWrapper">{inner}</li>"#)
}

pub fn listing_page(cards: &[String]) -> String {
    format!(
        r#"<!DOCTYPE html><html><body><ul class="List-c11n-8-84-3-photo-cards">{}</ul></body></html>"#,
        cards.concat()
    )
}

/// Serves canned pages by URL; anything else is a 404.
#[derive(Default)]
pub struct FixturePages {
    pages: HashMap<String, String>,
    fetched: RefCell<Vec<String>>,
}

impl FixturePages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }
}

impl PageSource for FixturePages {
    fn fetch(&self, url: &str) -> Result<String, ScraperError> {
        self.fetched.borrow_mut().push(url.to_string());
        self.pages.get(url).cloned().ok_or(ScraperError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

/// How the fake browser behaves for the attempt started by the next navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Accept,
    /// Only one text input shows up.
    FewInputs,
    /// The submit button is missing.
    MissingSubmit,
    /// Submit is clicked but the page never changes.
    NoConfirmation,
    /// The browser dies on navigation.
    Crash,
}

#[derive(Default)]
struct FakeState {
    script: VecDeque<Step>,
    current: Option<Step>,
    url: String,
    typed: Vec<String>,
    navigations: usize,
    submissions: Vec<Vec<String>>,
    closes: usize,
    fail_close: bool,
}

/// In-memory stand-in for a browser. Clones share state, so a test can keep
/// one handle while the submitter owns another.
#[derive(Clone, Default)]
pub struct FakeBrowser {
    state: Rc<RefCell<FakeState>>,
}

impl FakeBrowser {
    pub fn accepting() -> Self {
        Self::default()
    }

    /// Steps are consumed one per navigation; once empty, every attempt succeeds.
    pub fn scripted(steps: Vec<Step>) -> Self {
        let browser = Self::default();
        browser.state.borrow_mut().script = steps.into();
        browser
    }

    pub fn failing_close(self) -> Self {
        self.state.borrow_mut().fail_close = true;
        self
    }

    pub fn navigations(&self) -> usize {
        self.state.borrow().navigations
    }

    pub fn submissions(&self) -> Vec<Vec<String>> {
        self.state.borrow().submissions.clone()
    }

    pub fn closes(&self) -> usize {
        self.state.borrow().closes
    }
}

impl BrowserSession for FakeBrowser {
    fn navigate(&mut self, url: &str) -> Result<(), SubmitError> {
        let mut s = self.state.borrow_mut();
        s.navigations += 1;

        let step = s.script.pop_front().unwrap_or(Step::Accept);
        s.current = Some(step);
        if step == Step::Crash {
            return Err(SubmitError::Session("browser process exited".into()));
        }

        s.url = url.to_string();
        s.typed.clear();
        Ok(())
    }

    fn count_elements(&mut self, _selector: &str) -> Result<usize, SubmitError> {
        match self.state.borrow().current {
            Some(Step::FewInputs) => Ok(1),
            _ => Ok(3),
        }
    }

    fn type_into(&mut self, _selector: &str, _index: usize, text: &str) -> Result<(), SubmitError> {
        self.state.borrow_mut().typed.push(text.to_string());
        Ok(())
    }

    fn click(&mut self, selector: &str) -> Result<(), SubmitError> {
        let mut s = self.state.borrow_mut();
        let current = s.current;
        match current {
            Some(Step::MissingSubmit) => Err(SubmitError::ElementNotFound(selector.to_string())),
            Some(Step::NoConfirmation) => Ok(()),
            _ => {
                let typed = s.typed.clone();
                s.submissions.push(typed);
                s.url = format!("{}/formResponse", s.url);
                Ok(())
            }
        }
    }

    fn current_url(&mut self) -> Result<String, SubmitError> {
        Ok(self.state.borrow().url.clone())
    }

    fn close(&mut self) -> Result<(), SubmitError> {
        let mut s = self.state.borrow_mut();
        s.closes += 1;
        if s.fail_close {
            return Err(SubmitError::Browser("close failed".into()));
        }
        Ok(())
    }
}

pub struct FakeLauncher {
    browser: FakeBrowser,
    fail: bool,
}

impl FakeLauncher {
    pub fn new(browser: FakeBrowser) -> Self {
        Self {
            browser,
            fail: false,
        }
    }

    pub fn failing(browser: FakeBrowser) -> Self {
        Self {
            browser,
            fail: true,
        }
    }
}

impl SessionLauncher for FakeLauncher {
    type Session = FakeBrowser;

    fn launch(&self) -> Result<FakeBrowser, SubmitError> {
        if self.fail {
            return Err(SubmitError::Launch("chrome not found".into()));
        }
        Ok(self.browser.clone())
    }
}

/// Form settings with every wait and pause set to zero.
pub fn instant_form_config() -> FormConfig {
    FormConfig {
        url: "https://forms.test/form".into(),
        element_timeout: Duration::ZERO,
        confirmation_timeout: Duration::ZERO,
        poll_interval: Duration::ZERO,
        input_pause: Duration::ZERO,
        record_pause: Duration::ZERO,
        retry: RetryPolicy::immediate(3),
        ..FormConfig::default()
    }
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut bytes) = self.0.lock() {
            bytes.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a thread-local subscriber and returns the WARN lines it logged.
pub fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .without_time()
        .with_max_level(tracing::Level::TRACE)
        .finish();

    let out = tracing::subscriber::with_default(subscriber, f);

    let bytes = buffer.0.lock().map(|b| b.clone()).unwrap_or_default();
    let warnings = String::from_utf8_lossy(&bytes)
        .lines()
        .filter(|line| line.trim_start().starts_with("WARN"))
        .map(str::to_string)
        .collect();
    (out, warnings)
}
