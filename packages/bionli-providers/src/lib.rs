pub mod ensembl;
pub mod ncbi;

mod error;

pub use error::{Error, Result};

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::time;

const MAX_BACKOFF: Duration = Duration::from_secs(2);

/// One gene as reported by a knowledge source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneRecord {
	pub id: String,
	pub symbol: String,
	pub description: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub summary: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub organism: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub chromosome: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub function: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub biotype: Option<String>,
}

/// Bounded retry for transient outbound failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
	pub max_retries: u32,
	pub backoff: Duration,
}
impl RetryPolicy {
	pub fn new(max_retries: u32, backoff_ms: u64) -> Self {
		Self { max_retries, backoff: Duration::from_millis(backoff_ms) }
	}

	pub fn from_config(cfg: &bionli_config::Dispatch) -> Self {
		Self::new(cfg.max_retries, cfg.retry_backoff_ms)
	}

	pub fn none() -> Self {
		Self::new(0, 0)
	}
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
	value.map(str::trim).filter(|value| !value.is_empty()).map(str::to_string)
}

/// Sends the request built by `build`, retrying transient failures per `retry`.
///
/// Non-transient error statuses are returned to the caller untouched so it can map them.
pub(crate) async fn send_with_retry<F>(
	source_name: &'static str,
	retry: RetryPolicy,
	build: F,
) -> Result<Response>
where
	F: Fn() -> RequestBuilder,
{
	let mut backoff = retry.backoff;
	let mut attempt = 0;

	loop {
		let err = match build().send().await {
			Ok(res) if !is_transient_status(res.status()) => return Ok(res),
			Ok(res) => Error::Status { source_name, status: res.status().as_u16() },
			Err(err) => Error::Reqwest(err),
		};

		if !err.is_transient() || attempt >= retry.max_retries {
			return Err(err);
		}

		attempt += 1;

		tracing::warn!(
			source = source_name,
			attempt,
			error = %err,
			"Transient knowledge-source failure. Retrying."
		);
		time::sleep(backoff).await;

		backoff = backoff.saturating_mul(2).min(MAX_BACKOFF);
	}
}

fn is_transient_status(status: StatusCode) -> bool {
	status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn transient_statuses() {
		assert!(is_transient_status(StatusCode::TOO_MANY_REQUESTS));
		assert!(is_transient_status(StatusCode::BAD_GATEWAY));
		assert!(!is_transient_status(StatusCode::NOT_FOUND));
		assert!(!Error::Status { source_name: "NCBI Gene", status: 404 }.is_transient());
		assert!(Error::Status { source_name: "NCBI Gene", status: 503 }.is_transient());
	}

	#[test]
	fn blank_fields_become_none() {
		assert_eq!(non_empty(Some("  ")), None);
		assert_eq!(non_empty(Some(" 17 ")), Some("17".to_string()));
		assert_eq!(non_empty(None), None);
	}
}
