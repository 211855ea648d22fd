//! Browsing-identity configuration for one scrape session.
//!
//! Everything here exists to make the automated session look like a real
//! Japanese desktop visitor: launch flags, a warmed-up cookie jar, and request
//! headers consistent with a same-origin navigation from the storefront home.

use std::ffi::OsStr;
use std::path::PathBuf;

use headless_chrome::LaunchOptions;

/// Env var pointing at a Chrome/Chromium binary. Unset means the library's
/// own executable discovery.
pub const CHROME_PATH_ENV: &str = "CHROME_EXECUTABLE_PATH";

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/137.0.0.0 Safari/537.36";

/// Injected on every new document before page scripts run.
pub const WEBDRIVER_PATCH_JS: &str = r#"
    Object.defineProperty(navigator, 'webdriver', {
        get: () => undefined,
    });
"#;

/// One cookie of the simulated session. Placeholder values, not live
/// credentials — they only make the session look non-fresh.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    pub name: &'static str,
    pub value: &'static str,
    pub domain: &'static str,
}

/// Immutable browsing identity, scoped to a single scrape operation.
#[derive(Debug, Clone)]
pub struct SessionProfile {
    chrome_path: Option<PathBuf>,
}

impl SessionProfile {
    /// Japanese-locale desktop Chrome profile.
    pub fn japanese_desktop() -> Self {
        Self {
            chrome_path: std::env::var(CHROME_PATH_ENV).ok().map(PathBuf::from),
        }
    }

    pub fn user_agent(&self) -> &'static str {
        USER_AGENT
    }

    /// Launch options: headless, locale forced to ja-JP, automation signals
    /// disabled, common desktop window size.
    pub fn launch_options(&self) -> LaunchOptions<'_> {
        let args: Vec<&OsStr> = [
            "--lang=ja-JP",
            "--accept-lang=ja-JP",
            "--disable-web-security",
            "--disable-features=VizDisplayCompositor",
            "--no-sandbox",
            "--disable-setuid-sandbox",
            "--disable-dev-shm-usage",
            "--disable-blink-features=AutomationControlled",
            "--disable-gpu",
            "--single-process",
        ]
        .iter()
        .map(OsStr::new)
        .collect();

        LaunchOptions {
            headless: true,
            window_size: Some((1366, 768)),
            path: self.chrome_path.clone(),
            args,
            ..Default::default()
        }
    }

    /// Cookies of an existing Japanese-region shopping session: currency and
    /// locale preferences, the regional edge-node marker, session identifiers.
    pub fn cookies(&self) -> Vec<SessionCookie> {
        const DOMAIN: &str = ".amazon.co.jp";
        vec![
            SessionCookie { name: "i18n-prefs", value: "JPY", domain: DOMAIN },
            SessionCookie { name: "lc-main", value: "ja_JP", domain: DOMAIN },
            SessionCookie { name: "sp-cdn", value: "L5Z9:JP", domain: DOMAIN },
            SessionCookie { name: "ubid-acbjp", value: "xxx-xxxxxxx-xxxxxxx", domain: DOMAIN },
            SessionCookie { name: "session-id", value: "xxx-xxxxxxx-xxxxxxx", domain: DOMAIN },
            SessionCookie { name: "csm-hit", value: "tb:xxx+s-xxx|xxx", domain: DOMAIN },
        ]
    }

    /// Extra HTTP headers for a same-origin document navigation from the
    /// storefront home page.
    pub fn headers(&self) -> Vec<(&'static str, &'static str)> {
        vec![
            ("User-Agent", USER_AGENT),
            ("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7"),
            ("Content-Language", "ja-JP"),
            ("Accept-Language", "ja-JP,ja;q=1.0"),
            ("Referer", "https://www.amazon.co.jp/"),
            ("Cache-Control", "no-cache"),
            ("Sec-Fetch-Dest", "document"),
            ("Sec-Fetch-Mode", "navigate"),
            ("Sec-Fetch-Site", "same-origin"),
            ("Upgrade-Insecure-Requests", "1"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webdriver_patch_redefines_the_flag() {
        assert!(WEBDRIVER_PATCH_JS.contains("Object.defineProperty(navigator, 'webdriver'"));
        assert!(WEBDRIVER_PATCH_JS.contains("get: () => undefined"));
    }

    #[test]
    fn cookies_cover_locale_and_session_identity() {
        let profile = SessionProfile::japanese_desktop();
        let cookies = profile.cookies();
        let names: Vec<_> = cookies.iter().map(|c| c.name).collect();
        assert!(names.contains(&"i18n-prefs"));
        assert!(names.contains(&"lc-main"));
        assert!(names.contains(&"session-id"));
        assert!(cookies.iter().all(|c| c.domain == ".amazon.co.jp"));
    }

    #[test]
    fn headers_describe_a_same_origin_desktop_navigation() {
        let profile = SessionProfile::japanese_desktop();
        let headers = profile.headers();
        let get = |name: &str| {
            headers
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| *v)
                .unwrap_or_default()
        };
        assert!(get("User-Agent").contains("Chrome/"));
        assert_eq!(get("Accept-Language"), "ja-JP,ja;q=1.0");
        assert_eq!(get("Referer"), "https://www.amazon.co.jp/");
        assert_eq!(get("Sec-Fetch-Site"), "same-origin");
    }

    #[test]
    fn launch_options_force_japanese_headless_desktop() {
        let profile = SessionProfile { chrome_path: None };
        let options = profile.launch_options();
        assert!(options.headless);
        assert_eq!(options.window_size, Some((1366, 768)));
        let args: Vec<_> = options.args.iter().map(|a| a.to_string_lossy()).collect();
        assert!(args.iter().any(|a| a == "--lang=ja-JP"));
        assert!(args.iter().any(|a| a == "--disable-blink-features=AutomationControlled"));
        assert!(args.iter().any(|a| a == "--no-sandbox"));
        assert!(args.iter().any(|a| a == "--disable-gpu"));
    }
}
