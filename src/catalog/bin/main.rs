include!("../../lib.rs");
use std::net::SocketAddr;
use axum::{
    routing::{get, post},
    Router,
};
use crate::utils::sql::setup_tracing;
use crate::core::controller::AppState;
use crate::core::domain::Configuration;
use crate::catalog::controller::{create_book, delete_book, describe_book, patch_book, put_book, query_books};
use crate::catalog::factory::create_catalog_service;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = Configuration::from_env();
    let service = create_catalog_service(&config).await?;
    let addr: SocketAddr = config.listen_addr.parse()?;
    let state = AppState::new(service);

    let app = Router::new()
        .route("/books", post(create_book).get(query_books))
        .route("/books/:id",
               get(describe_book).put(put_book).patch(patch_book).delete(delete_book))
        .with_state(state);

    tracing::info!(addr = %addr, operator = config.operator.as_str(), "starting catalog server");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
