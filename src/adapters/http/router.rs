//! Router construction and the serve loop.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::get;
use tokio::net::TcpListener;
use tracing::info;

use super::{probe, request_id};
use crate::usecases::ProbeScraper;

/// Build the exporter's router.
pub fn build_router(scraper: Arc<ProbeScraper>) -> Router {
    Router::new()
        .route("/probe", get(probe::probe))
        .layer(middleware::from_fn(request_id::request_id))
        .with_state(scraper)
}

/// Serve `router` on `listener` until `shutdown` resolves.
///
/// Remote addresses are attached to every request for the access log.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(listen = %addr, "starting...");
    }

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
}
