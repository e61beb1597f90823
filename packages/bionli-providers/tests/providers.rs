use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};

use axum::{
	Json, Router,
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::get,
};
use serde_json::json;
use tokio::net::TcpListener;

use bionli_config::{EnsemblSource, NcbiSource};
use bionli_providers::{RetryPolicy, ensembl::EnsemblClient, ncbi::NcbiClient};

#[derive(Clone, Default)]
struct Counters {
	search: Arc<AtomicUsize>,
}

async fn spawn(router: Router) -> String {
	let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind test listener.");
	let addr = listener.local_addr().expect("Listener must have an address.");

	tokio::spawn(async move {
		axum::serve(listener, router).await.expect("Test server failed.");
	});

	format!("http://{addr}")
}

fn ncbi_source(api_base: String) -> NcbiSource {
	NcbiSource { api_base, api_key: None, timeout_ms: 2_000, max_results: 3 }
}

fn ensembl_source(api_base: String) -> EnsemblSource {
	EnsemblSource { enabled: true, api_base, timeout_ms: 2_000, max_results: 2 }
}

// Fails the first search with 503 to exercise the retry path.
async fn flaky_search(State(counters): State<Counters>) -> Response {
	if counters.search.fetch_add(1, Ordering::SeqCst) == 0 {
		return StatusCode::SERVICE_UNAVAILABLE.into_response();
	}

	Json(json!({ "esearchresult": { "idlist": ["7157"] } })).into_response()
}

async fn summary() -> Json<serde_json::Value> {
	Json(json!({
		"result": {
			"7157": {
				"name": "TP53",
				"description": "tumor protein p53",
				"summary": "short",
				"organism": { "scientificname": "Homo sapiens" },
				"chromosome": "17"
			}
		}
	}))
}

async fn empty_search() -> Json<serde_json::Value> {
	Json(json!({ "esearchresult": { "idlist": [] } }))
}

#[tokio::test]
async fn ncbi_retries_transient_failures_once() {
	let counters = Counters::default();
	let router = Router::new()
		.route("/esearch.fcgi", get(flaky_search))
		.route("/esummary.fcgi", get(summary))
		.with_state(counters.clone());
	let base = spawn(router).await;
	let client = NcbiClient::new(&ncbi_source(base), RetryPolicy::new(1, 10))
		.expect("Client must build.");
	let records = client.find_gene("TP53", "human").await.expect("Retry must recover.");

	assert_eq!(counters.search.load(Ordering::SeqCst), 2);
	assert_eq!(records.len(), 1);
	assert_eq!(records[0].symbol, "TP53");
	assert_eq!(
		records[0].function.as_deref(),
		Some("Functional information not available in summary")
	);
}

#[tokio::test]
async fn ncbi_gives_up_without_retry_budget() {
	let counters = Counters::default();
	let router = Router::new()
		.route("/esearch.fcgi", get(flaky_search))
		.route("/esummary.fcgi", get(summary))
		.with_state(counters.clone());
	let base = spawn(router).await;
	let client =
		NcbiClient::new(&ncbi_source(base), RetryPolicy::none()).expect("Client must build.");
	let err = client.find_gene("TP53", "human").await.expect_err("503 must surface.");

	assert!(err.is_transient());
	assert_eq!(counters.search.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn ncbi_empty_search_is_not_found() {
	let base = spawn(Router::new().route("/esearch.fcgi", get(empty_search))).await;
	let client =
		NcbiClient::new(&ncbi_source(base), RetryPolicy::none()).expect("Client must build.");

	assert!(client.find_gene("ZZZFAKE1", "human").await.expect("Search must succeed.").is_empty());
}

async fn xrefs(Path((_species, symbol)): Path<(String, String)>) -> Response {
	if symbol == "TP53" {
		return Json(json!([{ "id": "ENSG00000141510", "type": "gene" }])).into_response();
	}

	StatusCode::BAD_REQUEST.into_response()
}

async fn lookup(Path(id): Path<String>) -> Json<serde_json::Value> {
	Json(json!({
		"id": id,
		"display_name": "TP53",
		"seq_region_name": "17",
		"start": 1,
		"end": 2,
		"strand": 1
	}))
}

#[tokio::test]
async fn ensembl_maps_unknown_symbols_to_empty() {
	let router = Router::new()
		.route("/xrefs/symbol/{species}/{symbol}", get(xrefs))
		.route("/lookup/id/{id}", get(lookup));
	let base = spawn(router).await;
	let client = EnsemblClient::new(&ensembl_source(base), RetryPolicy::none())
		.expect("Client must build.");
	let found = client.find_gene("TP53", "human").await.expect("Lookup must succeed.");
	let missing = client.find_gene("ZZZFAKE1", "human").await.expect("Lookup must succeed.");

	assert_eq!(found.len(), 1);
	assert_eq!(found[0].id, "ENSG00000141510");
	assert_eq!(found[0].location.as_deref(), Some("17:1-2:1"));
	assert!(missing.is_empty());
}
