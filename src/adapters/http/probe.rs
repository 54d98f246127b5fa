//! `GET /probe?target=host[:port]`

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::usecases::{ProbeScraper, ScrapeError};

/// Query string of a probe request.
#[derive(Debug, Deserialize)]
pub struct ProbeParams {
    pub target: Option<String>,
}

/// Run a scrape and answer with the Prometheus text body.
pub async fn probe(
    State(scraper): State<Arc<ProbeScraper>>,
    Query(params): Query<ProbeParams>,
) -> Result<Response, ScrapeError> {
    let body = scraper.scrape(params.target.as_deref()).await?;

    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response())
}

impl IntoResponse for ScrapeError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (status, self.to_string()).into_response()
    }
}
