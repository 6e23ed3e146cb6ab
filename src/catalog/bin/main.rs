use std::net::SocketAddr;
use std::sync::Arc;
use lambda_http::{run, Error};
use tracing::info;
use book_catalog::catalog::controller::routes;
use book_catalog::catalog::factory::create_catalog_service;
use book_catalog::core::controller::AppState;
use book_catalog::core::domain::Configuration;
use book_catalog::utils::logs::setup_tracing;

// See https://docs.aws.amazon.com/lambda/latest/dg/lambda-rust.html
// https://docs.aws.amazon.com/lambda/latest/dg/rust-http-events.html

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Configuration::from_env();
    setup_tracing(&config);

    let catalog_service = Arc::from(create_catalog_service(&config).await?);
    let lambda = config.is_lambda();
    let bind_addr = config.bind_addr.clone();
    info!(environment = config.environment.as_str(), store = %config.store, lambda, "starting book catalog");
    let state = AppState::new(config, catalog_service);

    if lambda {
        return run(routes::<lambda_http::Body>(state)).await;
    }

    let addr: SocketAddr = bind_addr.parse()?;
    info!(%addr, "listening");
    axum::Server::bind(&addr)
        .serve(routes::<axum::body::Body>(state).into_make_service())
        .await?;
    Ok(())
}
