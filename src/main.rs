mod api;
mod behavior;
mod driver;
mod extract;
mod scrape;
mod search_url;
mod session;

use axum::{routing::get, Router};
use dotenv::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(api::health, api::scrape_sponsored),
    components(schemas(api::ScrapeResponse, api::ErrorResponse, extract::SponsoredProduct)),
    tags(
        (name = "scrape", description = "Sponsored-listing scrape API")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let app = Router::new()
        .merge(
            SwaggerUi::new("/sponsored-crawler-swagger")
                .url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .route("/", get(api::health))
        .route("/amazon/scrape/sponsored-products", get(api::scrape_sponsored));

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    println!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
