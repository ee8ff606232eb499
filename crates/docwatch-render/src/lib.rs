//! Headless Chrome adapter for `docwatch-core`'s `PageSource` port.
//!
//! The target listing is client-rendered, so a plain GET returns an empty
//! shell; we drive a real browser and read the DOM after navigation settles.

use std::{path::PathBuf, time::Duration};

use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};

use docwatch_core::{errors::Error, ports::PageSource, Result};

/// Fetches rendered HTML by launching an isolated headless Chrome session
/// per call. The session is torn down on every exit path: the browser handle
/// lives entirely inside the blocking closure and is dropped with it.
pub struct ChromePageSource {
    chrome_path: Option<PathBuf>,
    timeout: Duration,
}

impl ChromePageSource {
    pub fn new(chrome_path: Option<PathBuf>, timeout: Duration) -> Self {
        Self {
            chrome_path,
            timeout,
        }
    }

    fn fetch_blocking(chrome_path: Option<PathBuf>, timeout: Duration, url: &str) -> Result<String> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .path(chrome_path)
            .idle_browser_timeout(timeout)
            .build()
            .map_err(|e| Error::Fetch(format!("browser launch options: {e}")))?;

        let browser =
            Browser::new(options).map_err(|e| Error::Fetch(format!("browser launch: {e}")))?;
        let tab = browser
            .new_tab()
            .map_err(|e| Error::Fetch(format!("new tab: {e}")))?;
        tab.set_default_timeout(timeout);

        tab.navigate_to(url)
            .map_err(|e| Error::Fetch(format!("navigate: {e}")))?;
        tab.wait_until_navigated()
            .map_err(|e| Error::Fetch(format!("render wait: {e}")))?;

        tab.get_content()
            .map_err(|e| Error::Fetch(format!("read content: {e}")))
    }
}

#[async_trait]
impl PageSource for ChromePageSource {
    async fn fetch_rendered(&self, url: &str) -> Result<String> {
        let chrome_path = self.chrome_path.clone();
        let timeout = self.timeout;
        let url = url.to_string();

        let task = tokio::task::spawn_blocking(move || {
            Self::fetch_blocking(chrome_path, timeout, &url)
        });

        // The per-tab timeout bounds individual CDP calls; this outer bound
        // covers launch and teardown too, so a wedged browser cannot block
        // all future cycles.
        let outer = self.timeout.saturating_mul(2);
        match tokio::time::timeout(outer, task).await {
            Ok(Ok(res)) => res,
            Ok(Err(join_err)) => Err(Error::Fetch(format!("render task failed: {join_err}"))),
            Err(_) => Err(Error::Fetch(format!(
                "render timed out after {}s",
                self.timeout.as_secs()
            ))),
        }
    }
}
