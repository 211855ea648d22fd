//! The scrape pipeline: launch, configure, navigate, read, wait, extract,
//! close. One browser per invocation, fully sequential, released on every
//! exit path.

use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use crate::behavior;
use crate::driver::{ChromeSession, PageDriver};
use crate::extract::{self, SponsoredProduct, SPONSORED_MARKER_SELECTOR};
use crate::search_url::generate_url;
use crate::session::SessionProfile;

/// Pipeline timing knobs.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// How long to wait for the first sponsored-label marker.
    pub marker_timeout: Duration,
    /// Dwell pause after each simulated scroll step.
    pub scroll_pause: Duration,
    /// Upper bound on navigation and element waits.
    pub navigation_timeout: Duration,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            marker_timeout: Duration::from_millis(10_000),
            scroll_pause: Duration::from_millis(1_000),
            navigation_timeout: Duration::from_secs(30),
        }
    }
}

/// Scrape sponsored listings for the given search terms from one results page.
///
/// An empty vec means the page loaded but carried no sponsored content; errors
/// are reserved for not being able to complete the pipeline at all.
pub async fn scrape_sponsored_products(terms: &[String]) -> Result<Vec<SponsoredProduct>> {
    scrape_sponsored_products_with(terms, &ScrapeOptions::default()).await
}

pub async fn scrape_sponsored_products_with(
    terms: &[String],
    options: &ScrapeOptions,
) -> Result<Vec<SponsoredProduct>> {
    info!(?terms, "starting sponsored-product scrape");
    let profile = SessionProfile::japanese_desktop();
    // Launch failure is fatal and leaves nothing to release.
    let session = ChromeSession::launch(&profile, options.navigation_timeout)?;
    run_scrape(session, terms, options).await
}

/// Drive the pipeline against an already-launched session and close it exactly
/// once, whatever happens in between. A close failure after a pipeline error
/// is logged rather than propagated so it cannot mask the root cause.
pub(crate) async fn run_scrape<D: PageDriver>(
    driver: D,
    terms: &[String],
    options: &ScrapeOptions,
) -> Result<Vec<SponsoredProduct>> {
    let outcome = drive_pipeline(&driver, terms, options).await;
    let closed = driver.close();
    match outcome {
        Ok(products) => {
            closed?;
            info!(count = products.len(), "scrape finished");
            Ok(products)
        }
        Err(e) => {
            if let Err(close_err) = closed {
                warn!(error = %close_err, "browser release failed after pipeline error");
            }
            Err(e)
        }
    }
}

async fn drive_pipeline<D: PageDriver>(
    driver: &D,
    terms: &[String],
    options: &ScrapeOptions,
) -> Result<Vec<SponsoredProduct>> {
    let url = generate_url(terms);
    info!(%url, "navigating to search results");
    driver.navigate_to(&url)?;

    info!("simulating reading behavior");
    behavior::simulate_reading(driver, options.scroll_pause).await;

    info!("waiting for sponsored-label marker");
    if !driver.wait_for_selector(SPONSORED_MARKER_SELECTOR, options.marker_timeout) {
        // Unsponsored searches legitimately omit the marker entirely.
        info!("no sponsored marker appeared; treating as empty result");
        return Ok(Vec::new());
    }

    let html = driver.content()?;
    Ok(extract::extract_sponsored_products(&html))
}
