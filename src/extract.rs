//! Sponsored-listing extraction from a rendered search-results page.
//!
//! Amazon marks paid placements with one of four selector patterns, each
//! sitting somewhere inside (or next to) the card's `data-cy="title-recipe"`
//! container. Extraction scans the selectors in order, resolves each marker to
//! its enclosing card, and deduplicates cards by their raw inner markup —
//! the same marker often matches more than one pattern on one card.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Marker patterns currently used on amazon.co.jp results, in scan order:
/// generic sponsored-label icon, labeled-popover link, brand label, plain
/// sponsored text.
pub const SPONSORED_SELECTORS: [&str; 4] = [
    "span.puis-sponsored-label-info-icon",
    "a.puis-label-popover.puis-sponsored-label-text",
    "span.sponsored-brand-label-info-desktop",
    "span.puis-sponsored-label-text",
];

/// The marker the content wait blocks on before extraction runs.
pub const SPONSORED_MARKER_SELECTOR: &str = "span.puis-sponsored-label-info-icon";

static MARKER_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    SPONSORED_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});
static TITLE_RECIPE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"[data-cy="title-recipe"]"#).unwrap());
static HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h2").unwrap());

/// One sponsored listing. `title` is empty when the card carries no heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SponsoredProduct {
    pub title: String,
}

/// Extract sponsored listings from rendered document HTML.
///
/// Insertion order is discovery order: selector-list order first, DOM order
/// within each selector. A marker whose card cannot be resolved produces no
/// record; a card without a heading still counts, with an empty title.
pub fn extract_sponsored_products(html: &str) -> Vec<SponsoredProduct> {
    let document = Html::parse_document(html);
    let mut seen_cards: Vec<String> = Vec::new();
    let mut products = Vec::new();

    for selector in MARKER_SELECTORS.iter() {
        for marker in document.select(selector) {
            let Some(card) = enclosing_card(marker) else {
                continue;
            };
            let markup = card.inner_html();
            if seen_cards.contains(&markup) {
                continue;
            }
            let title = card
                .select(&HEADING)
                .next()
                .map(|h| h.text().collect::<String>().trim().to_string())
                .unwrap_or_default();
            seen_cards.push(markup);
            products.push(SponsoredProduct { title });
        }
    }

    products
}

/// Resolve a marker element to its product card: the nearest
/// `data-cy="title-recipe"` ancestor, or — when the marker sits outside that
/// container — the nearest `role="listitem"` ancestor's first title-recipe
/// descendant.
fn enclosing_card(marker: ElementRef) -> Option<ElementRef> {
    for node in marker.ancestors() {
        if let Some(el) = ElementRef::wrap(node) {
            if el.value().attr("data-cy") == Some("title-recipe") {
                return Some(el);
            }
        }
    }
    for node in marker.ancestors() {
        if let Some(el) = ElementRef::wrap(node) {
            if el.value().attr("role") == Some("listitem") {
                return el.select(&TITLE_RECIPE).next();
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(marker: &str, title: Option<&str>) -> String {
        let heading = title.map(|t| format!("<h2><span>{t}</span></h2>")).unwrap_or_default();
        format!(
            r#"<div role="listitem"><div data-cy="title-recipe">{marker}{heading}</div></div>"#
        )
    }

    fn page(body: &str) -> String {
        format!("<html><body><div class=\"s-result-list\">{body}</div></body></html>")
    }

    const ICON: &str = r#"<span class="puis-sponsored-label-info-icon"></span>"#;
    const POPOVER: &str = r##"<a class="puis-label-popover puis-sponsored-label-text" href="#">スポンサー</a>"##;
    const BRAND: &str = r#"<span class="sponsored-brand-label-info-desktop"></span>"#;
    const TEXT: &str = r#"<span class="puis-sponsored-label-text">スポンサー</span>"#;

    fn titles(html: &str) -> Vec<String> {
        extract_sponsored_products(html)
            .into_iter()
            .map(|p| p.title)
            .collect()
    }

    #[test]
    fn two_markers_on_one_card_yield_one_record() {
        let body = card(&format!("{ICON}{TEXT}"), Some("化粧水 500ml"));
        assert_eq!(titles(&page(&body)), vec!["化粧水 500ml"]);
    }

    #[test]
    fn four_cards_come_back_in_selector_scan_order() {
        // DOM order is the reverse of selector order; the scan order wins.
        let body = [
            card(TEXT, Some("text variant")),
            card(BRAND, Some("brand variant")),
            card(POPOVER, Some("popover variant")),
            card(ICON, Some("icon variant")),
        ]
        .concat();
        assert_eq!(
            titles(&page(&body)),
            vec!["icon variant", "popover variant", "brand variant", "text variant"]
        );
    }

    #[test]
    fn missing_heading_yields_empty_title_not_missing_record() {
        let body = card(ICON, None);
        assert_eq!(titles(&page(&body)), vec![""]);
    }

    #[test]
    fn marker_outside_title_recipe_falls_back_through_listitem() {
        let body = format!(
            r#"<div role="listitem">{ICON}<div data-cy="title-recipe"><h2>回り込みタイトル</h2></div></div>"#
        );
        assert_eq!(titles(&page(&body)), vec!["回り込みタイトル"]);
    }

    #[test]
    fn marker_with_no_resolvable_card_is_skipped() {
        let body = format!(r#"<div class="widget">{ICON}</div>"#);
        assert!(titles(&page(&body)).is_empty());
    }

    #[test]
    fn identical_titles_on_distinct_cards_both_survive() {
        // Same title, different card markup: dedup keys on the card, not the title.
        let twin = format!(
            r#"<div role="listitem"><div data-cy="title-recipe">{ICON}<h2>同じ商品名</h2></div></div>"#
        );
        let body = card(ICON, Some("同じ商品名")) + &twin;
        assert_eq!(titles(&page(&body)), vec!["同じ商品名", "同じ商品名"]);
    }

    #[test]
    fn page_without_markers_extracts_nothing() {
        let body = r#"<div data-cy="title-recipe"><h2>オーガニック検索結果</h2></div>"#;
        assert!(titles(&page(body)).is_empty());
    }

    #[test]
    fn heading_text_is_trimmed() {
        let body = card(ICON, Some("  余白つき  "));
        assert_eq!(titles(&page(&body)), vec!["余白つき"]);
    }
}
