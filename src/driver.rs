//! The seam between the scrape pipeline and the browser-automation layer.
//!
//! The pipeline only ever talks to a [`PageDriver`]; `ChromeSession` is the
//! production implementation on top of `headless_chrome`. Everything crossing
//! this boundary is a plain string: a URL in, a script in, rendered HTML out.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use headless_chrome::protocol::cdp::{Network, Page};
use headless_chrome::{Browser, Tab};
use tracing::{debug, warn};

use crate::session::{SessionProfile, WEBDRIVER_PATCH_JS};

/// Minimal page surface the scrape pipeline needs.
pub trait PageDriver {
    /// Navigate and wait for the browser's own navigation-settled signal.
    fn navigate_to(&self, url: &str) -> Result<()>;

    /// Run a fire-and-forget script in the page (scroll steps).
    fn evaluate(&self, js: &str) -> Result<()>;

    /// Block until `selector` matches, up to `timeout`. `false` means the
    /// element never appeared — including wait errors, which the target page
    /// produces legitimately when no sponsored content exists.
    fn wait_for_selector(&self, selector: &str, timeout: Duration) -> bool;

    /// Rendered document HTML, serialized out of the page.
    fn content(&self) -> Result<String>;

    /// Release the browser resources. Called exactly once per session.
    fn close(&self) -> Result<()>;
}

/// One headless Chrome process with a single configured page.
pub struct ChromeSession {
    browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeSession {
    /// Launch Chrome with the profile's identity applied: stealth patch on
    /// every new document, session cookies, request headers, and a default
    /// timeout bounding navigation and element waits.
    pub fn launch(profile: &SessionProfile, default_timeout: Duration) -> Result<Self> {
        let browser =
            Browser::new(profile.launch_options()).context("failed to launch headless Chrome")?;
        let tab = browser.new_tab().context("failed to open page")?;
        tab.set_default_timeout(default_timeout);

        tab.call_method(Page::AddScriptToEvaluateOnNewDocument {
            source: WEBDRIVER_PATCH_JS.to_string(),
            world_name: None,
            include_command_line_api: None,
            run_immediately: None,
        })
        .context("failed to register webdriver suppression script")?;

        for cookie in profile.cookies() {
            let result = tab.call_method(Network::SetCookie {
                name: cookie.name.to_string(),
                value: cookie.value.to_string(),
                url: None,
                domain: Some(cookie.domain.to_string()),
                path: None,
                secure: Some(true),
                http_only: Some(false),
                same_site: None,
                expires: None,
                priority: None,
                same_party: None,
                source_scheme: None,
                source_port: None,
                partition_key: None,
            });
            if let Err(e) = result {
                warn!(cookie = cookie.name, error = %e, "failed to set session cookie");
            }
        }

        let headers: HashMap<&str, &str> = profile.headers().into_iter().collect();
        tab.set_extra_http_headers(headers)
            .context("failed to apply request headers")?;
        tab.set_user_agent(profile.user_agent(), Some("ja-JP,ja;q=1.0"), None)
            .context("failed to apply user agent")?;

        Ok(Self { browser, tab })
    }
}

impl PageDriver for ChromeSession {
    fn navigate_to(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .with_context(|| format!("navigation to {url} failed"))?;
        self.tab
            .wait_until_navigated()
            .context("page never settled after navigation")?;
        Ok(())
    }

    fn evaluate(&self, js: &str) -> Result<()> {
        self.tab.evaluate(js, false).context("page script failed")?;
        Ok(())
    }

    fn wait_for_selector(&self, selector: &str, timeout: Duration) -> bool {
        match self.tab.wait_for_element_with_custom_timeout(selector, timeout) {
            Ok(_) => true,
            Err(e) => {
                debug!(selector, error = %e, "selector did not appear");
                false
            }
        }
    }

    fn content(&self) -> Result<String> {
        self.tab.get_content().context("failed to read page content")
    }

    fn close(&self) -> Result<()> {
        if let Err(e) = self.tab.close(false) {
            debug!(error = %e, "page close reported an error");
        }
        if let Some(pid) = self.browser.get_process_id() {
            debug!(pid, "browser process released");
        }
        Ok(())
    }
}
