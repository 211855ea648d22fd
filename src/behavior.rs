//! Human-reading simulation before extraction.

use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::driver::PageDriver;

/// Fixed scroll sequence: quarter of the page, half, back to top. Targets are
/// computed from whatever height the page actually reports, so a short or
/// empty document just clamps to the top.
const SCROLL_STEPS: [&str; 3] = [
    "window.scrollTo(0, document.body.scrollHeight / 4);",
    "window.scrollTo(0, document.body.scrollHeight / 2);",
    "window.scrollTo(0, 0);",
];

/// Scroll through the page with a dwell pause after each step. The pauses are
/// the point — they produce scroll events and dwell time a human reader would.
/// Script errors are logged and swallowed; this step never aborts the scrape.
pub async fn simulate_reading<D: PageDriver>(driver: &D, pause: Duration) {
    for step in SCROLL_STEPS {
        if let Err(e) = driver.evaluate(step) {
            debug!(error = %e, "scroll step failed");
        }
        sleep(pause).await;
    }
}
