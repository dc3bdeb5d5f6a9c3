//! Chromium session driven over CDP with chromiumoxide.
//!
//! chromiumoxide is async; each session owns a current-thread tokio runtime
//! and blocks on every call, so the rest of the crate stays synchronous.

use crate::config::FormConfig;
use crate::submitter::{BrowserSession, SessionLauncher, SubmitError};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tracing::{debug, info};

const WINDOW_WIDTH: u32 = 1920;
const WINDOW_HEIGHT: u32 = 1080;

pub struct ChromeLauncher {
    headless: bool,
    navigation_timeout: Duration,
}

impl ChromeLauncher {
    pub fn new(headless: bool, navigation_timeout: Duration) -> Self {
        Self {
            headless,
            navigation_timeout,
        }
    }

    pub fn from_config(config: &FormConfig) -> Self {
        // Page loads get the same budget as element waits, times two.
        Self::new(config.headless, config.element_timeout * 2)
    }

    fn browser_config(&self) -> Result<BrowserConfig, SubmitError> {
        let builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-dev-shm-usage");

        let builder = if self.headless {
            builder.window_size(WINDOW_WIDTH, WINDOW_HEIGHT)
        } else {
            builder.with_head()
        };

        builder.build().map_err(SubmitError::Launch)
    }
}

impl SessionLauncher for ChromeLauncher {
    type Session = ChromeSession;

    fn launch(&self) -> Result<ChromeSession, SubmitError> {
        info!("Setting up Chrome (headless: {})", self.headless);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SubmitError::Launch(e.to_string()))?;

        let config = self.browser_config()?;

        let (browser, mut handler) = runtime
            .block_on(Browser::launch(config))
            .map_err(|e| SubmitError::Launch(e.to_string()))?;

        // The handler only makes progress while the runtime is driven, which
        // is exactly while a session call is blocking on it.
        let handler_task = runtime.spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler event error: {e}");
                }
            }
        });

        let page = runtime
            .block_on(browser.new_page("about:blank"))
            .map_err(|e| SubmitError::Launch(e.to_string()))?;

        Ok(ChromeSession {
            runtime,
            browser,
            page,
            handler_task,
            navigation_timeout: self.navigation_timeout,
        })
    }
}

pub struct ChromeSession {
    runtime: Runtime,
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    navigation_timeout: Duration,
}

/// Sorts CDP failures into "retry the attempt" and "the browser is gone".
fn classify(e: CdpError) -> SubmitError {
    let msg = e.to_string();
    match e {
        CdpError::NotFound => SubmitError::ElementNotFound(msg),
        CdpError::Timeout => SubmitError::WaitTimeout(msg),
        CdpError::Ws(_) | CdpError::ChannelSendError(_) | CdpError::NoResponse => {
            SubmitError::Session(msg)
        }
        _ if msg.contains("No node with given id") || msg.contains("Could not find node") => {
            SubmitError::StaleElement(msg)
        }
        _ => SubmitError::Browser(msg),
    }
}

impl BrowserSession for ChromeSession {
    fn navigate(&mut self, url: &str) -> Result<(), SubmitError> {
        debug!("Navigating to {url}");
        let page = &self.page;
        let budget = self.navigation_timeout;

        self.runtime
            .block_on(async {
                tokio::time::timeout(budget, async {
                    page.goto(url).await?;
                    page.wait_for_navigation().await?;
                    Ok::<_, CdpError>(())
                })
                .await
            })
            .map_err(|_| SubmitError::WaitTimeout(format!("page load of {url}")))?
            .map_err(classify)
    }

    fn count_elements(&mut self, selector: &str) -> Result<usize, SubmitError> {
        match self.runtime.block_on(self.page.find_elements(selector)) {
            Ok(elements) => Ok(elements.len()),
            Err(CdpError::NotFound) => Ok(0),
            Err(e) => Err(classify(e)),
        }
    }

    fn type_into(&mut self, selector: &str, index: usize, text: &str) -> Result<(), SubmitError> {
        let page = &self.page;

        self.runtime.block_on(async {
            let elements = page.find_elements(selector).await.map_err(classify)?;
            let input = elements.get(index).ok_or_else(|| {
                SubmitError::ElementNotFound(format!("{selector} #{index}"))
            })?;

            input.click().await.map_err(classify)?;
            input.type_str(text).await.map_err(classify)?;
            Ok(())
        })
    }

    fn click(&mut self, selector: &str) -> Result<(), SubmitError> {
        let page = &self.page;

        self.runtime.block_on(async {
            let element = page.find_element(selector).await.map_err(classify)?;
            element.click().await.map_err(classify)?;
            Ok(())
        })
    }

    fn current_url(&mut self) -> Result<String, SubmitError> {
        self.runtime
            .block_on(self.page.url())
            .map(Option::unwrap_or_default)
            .map_err(classify)
    }

    fn close(&mut self) -> Result<(), SubmitError> {
        let browser = &mut self.browser;

        let result = self.runtime.block_on(async {
            browser
                .close()
                .await
                .map_err(|e| SubmitError::Session(e.to_string()))?;
            browser
                .wait()
                .await
                .map_err(|e| SubmitError::Session(e.to_string()))?;
            Ok(())
        });

        self.handler_task.abort();
        result
    }
}
