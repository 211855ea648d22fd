//! HTTP layer: a thin pass-through from the query string to the scrape
//! pipeline. Status codes keep "no sponsored listings" distinguishable from
//! "pipeline failed".

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::extract::SponsoredProduct;
use crate::scrape;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScrapeParams {
    /// Comma-separated search keywords, e.g. `q=化粧水,美白`.
    pub q: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScrapeResponse {
    #[serde(rename = "sponsoredProducts")]
    pub sponsored_products: Vec<SponsoredProduct>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse { error: message.to_string() })).into_response()
}

/// Split the raw `q` value into non-empty, trimmed keywords.
pub(crate) fn parse_keywords(q: Option<&str>) -> Vec<String> {
    q.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|kw| !kw.is_empty())
        .map(str::to_string)
        .collect()
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is running")),
    tag = "scrape"
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Server is running" }))
}

#[utoipa::path(
    get,
    path = "/amazon/scrape/sponsored-products",
    params(ScrapeParams),
    responses(
        (status = 200, description = "Sponsored listings extracted", body = ScrapeResponse),
        (status = 400, description = "Missing keywords, or the search produced no sponsored listings", body = ErrorResponse),
        (status = 500, description = "Scrape pipeline failed", body = ErrorResponse)
    ),
    tag = "scrape"
)]
pub async fn scrape_sponsored(Query(params): Query<ScrapeParams>) -> Response {
    let keywords = parse_keywords(params.q.as_deref());
    if keywords.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "query parameter \"q\" is required: /amazon/scrape/sponsored-products?q=<word1>,<word2>",
        );
    }

    match scrape::scrape_sponsored_products(&keywords).await {
        Ok(products) if products.is_empty() => {
            error_response(StatusCode::BAD_REQUEST, "no sponsored products found")
        }
        Ok(products) => {
            (StatusCode::OK, Json(ScrapeResponse { sponsored_products: products })).into_response()
        }
        Err(e) => {
            error!(error = %e, "scrape pipeline failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "scraping failed")
        }
    }
}
