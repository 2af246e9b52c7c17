// PlaywrightTarget - `Target` over a playwright-rs page
//
// Owns the Playwright driver, one Chromium browser and one page. Selectors
// are handed to Playwright unchanged, so chained locators (`a >> nth=1`)
// resolve in Playwright's selector engine.

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::target::{Target, WaitUntil};
use async_trait::async_trait;
use playwright_rs::protocol::KeyboardOptions;
use playwright_rs::{
    Browser, GotoOptions, LaunchOptions, Page, Playwright, ScreenshotOptions,
    WaitUntil as PageWaitUntil,
};
use std::time::Duration;

fn target_error(action: &str, err: playwright_rs::Error) -> Error {
    Error::Target(format!("{} failed: {}", action, err))
}

impl From<WaitUntil> for PageWaitUntil {
    fn from(wait_until: WaitUntil) -> Self {
        match wait_until {
            WaitUntil::Load => PageWaitUntil::Load,
            WaitUntil::DomContentLoaded => PageWaitUntil::DomContentLoaded,
            WaitUntil::NetworkIdle => PageWaitUntil::NetworkIdle,
            WaitUntil::Commit => PageWaitUntil::Commit,
        }
    }
}

/// A launched Chromium page
pub struct PlaywrightTarget {
    playwright: Playwright,
    browser: Browser,
    page: Page,
}

impl PlaywrightTarget {
    /// Launches Chromium with `headless`, `slow_mo` and `timeout` from settings.
    pub async fn launch(settings: &Settings) -> Result<Self> {
        let playwright = Playwright::launch()
            .await
            .map_err(|e| target_error("launch playwright", e))?;

        let options = LaunchOptions::new()
            .headless(settings.headless)
            .slow_mo(settings.slow_mo_ms as f64)
            .timeout(settings.timeout_ms as f64);
        let browser = playwright
            .chromium()
            .launch_with_options(options)
            .await
            .map_err(|e| target_error("launch chromium", e))?;

        let page = browser
            .new_page()
            .await
            .map_err(|e| target_error("open page", e))?;

        tracing::info!(headless = settings.headless, "Launched chromium");
        Ok(Self {
            playwright,
            browser,
            page,
        })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Closes the browser and stops the driver.
    pub async fn close(self) -> Result<()> {
        self.browser
            .close()
            .await
            .map_err(|e| target_error("close browser", e))?;
        self.playwright
            .shutdown()
            .await
            .map_err(|e| target_error("shutdown playwright", e))
    }
}

#[async_trait]
impl Target for PlaywrightTarget {
    async fn navigate(&self, url: &str, wait_until: WaitUntil, timeout: Duration) -> Result<()> {
        let options = GotoOptions::new()
            .timeout(timeout)
            .wait_until(wait_until.into());
        self.page
            .goto(url, Some(options))
            .await
            .map(|_| ())
            .map_err(|e| target_error("goto", e))
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.page.url())
    }

    async fn title(&self) -> Result<String> {
        self.page.title().await.map_err(|e| target_error("title", e))
    }

    async fn evaluate(&self, expression: &str) -> Result<String> {
        self.page
            .evaluate_value(expression)
            .await
            .map_err(|e| target_error("evaluate", e))
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        self.page
            .locator(selector)
            .await
            .count()
            .await
            .map_err(|e| Error::interaction(selector, e))
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        self.page
            .locator(selector)
            .await
            .is_visible()
            .await
            .map_err(|e| Error::interaction(selector, e))
    }

    async fn is_enabled(&self, selector: &str) -> Result<bool> {
        self.page
            .locator(selector)
            .await
            .is_enabled()
            .await
            .map_err(|e| Error::interaction(selector, e))
    }

    async fn text_content(&self, selector: &str) -> Result<Option<String>> {
        self.page
            .locator(selector)
            .await
            .text_content()
            .await
            .map_err(|e| Error::interaction(selector, e))
    }

    async fn all_text_contents(&self, selector: &str) -> Result<Vec<String>> {
        let locator = self.page.locator(selector).await;
        let count = locator
            .count()
            .await
            .map_err(|e| Error::interaction(selector, e))?;

        let mut texts = Vec::with_capacity(count);
        for index in 0..count {
            let text = locator
                .nth(index as i32)
                .text_content()
                .await
                .map_err(|e| Error::interaction(selector, e))?;
            texts.push(text.unwrap_or_default());
        }
        Ok(texts)
    }

    async fn input_value(&self, selector: &str) -> Result<String> {
        self.page
            .locator(selector)
            .await
            .input_value(None)
            .await
            .map_err(|e| Error::interaction(selector, e))
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.page
            .locator(selector)
            .await
            .click(None)
            .await
            .map_err(|e| Error::interaction(selector, e))
    }

    async fn fill(&self, selector: &str, text: &str) -> Result<()> {
        self.page
            .locator(selector)
            .await
            .fill(text, None)
            .await
            .map_err(|e| Error::interaction(selector, e))
    }

    async fn clear(&self, selector: &str) -> Result<()> {
        self.page
            .locator(selector)
            .await
            .clear(None)
            .await
            .map_err(|e| Error::interaction(selector, e))
    }

    async fn type_text(&self, selector: &str, text: &str, delay: Duration) -> Result<()> {
        self.click(selector).await?;
        let options = KeyboardOptions::builder()
            .delay(delay.as_millis() as f64)
            .build();
        self.page
            .keyboard()
            .type_text(text, Some(options))
            .await
            .map_err(|e| Error::interaction(selector, e))
    }

    async fn press_key(&self, key: &str) -> Result<()> {
        self.page
            .keyboard()
            .press(key, None)
            .await
            .map_err(|e| target_error("keyboard press", e))
    }

    async fn screenshot(&self, full_page: bool) -> Result<Vec<u8>> {
        let options = ScreenshotOptions::builder().full_page(full_page).build();
        self.page
            .screenshot(Some(options))
            .await
            .map_err(|e| target_error("screenshot", e))
    }
}
