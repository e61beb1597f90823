use std::time::Duration;

use reqwest::{Client, StatusCode, header::ACCEPT};
use serde_json::Value;

use bionli_config::EnsemblSource;

use crate::{Error, GeneRecord, Result, RetryPolicy};

pub const SOURCE_NAME: &str = "Ensembl";

/// Ensembl REST lookups: `xrefs/symbol` to find ids, then `lookup/id` per id.
#[derive(Clone, Debug)]
pub struct EnsemblClient {
	client: Client,
	cfg: EnsemblSource,
	retry: RetryPolicy,
}
impl EnsemblClient {
	pub fn new(cfg: &EnsemblSource, retry: RetryPolicy) -> Result<Self> {
		let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;

		Ok(Self { client, cfg: cfg.clone(), retry })
	}

	/// Returns an empty list when Ensembl does not know `symbol` for `species`.
	pub async fn find_gene(&self, symbol: &str, species: &str) -> Result<Vec<GeneRecord>> {
		let url = format!("{}/xrefs/symbol/{species}/{symbol}", self.cfg.api_base);
		let Some(xrefs) = self.get_json(&url).await? else {
			return Ok(Vec::new());
		};
		let ids = parse_xref_ids(&xrefs, self.cfg.max_results as usize)?;
		let mut records = Vec::with_capacity(ids.len());

		for id in ids {
			let url = format!("{}/lookup/id/{id}", self.cfg.api_base);

			match self.get_json(&url).await? {
				Some(lookup) => records.push(parse_lookup(&id, &lookup)),
				None => tracing::debug!(id = %id, "Ensembl lookup returned no gene."),
			}
		}

		Ok(records)
	}

	// 400 and 404 both mean "unknown" to Ensembl REST.
	async fn get_json(&self, url: &str) -> Result<Option<Value>> {
		let res = crate::send_with_retry(SOURCE_NAME, self.retry, || {
			self.client.get(url).header(ACCEPT, "application/json")
		})
		.await?;
		let status = res.status();

		if matches!(status, StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND) {
			return Ok(None);
		}
		if !status.is_success() {
			return Err(Error::Status { source_name: SOURCE_NAME, status: status.as_u16() });
		}

		Ok(Some(res.json().await?))
	}
}

fn parse_xref_ids(json: &Value, limit: usize) -> Result<Vec<String>> {
	let items = json.as_array().ok_or_else(|| Error::InvalidResponse {
		message: "Ensembl xrefs response must be an array.".to_string(),
	})?;

	Ok(items
		.iter()
		.filter_map(|item| item.get("id").and_then(Value::as_str))
		.take(limit)
		.map(str::to_string)
		.collect())
}

fn parse_lookup(id: &str, json: &Value) -> GeneRecord {
	let text = |key: &str| crate::non_empty(json.get(key).and_then(Value::as_str));
	let chromosome = text("seq_region_name");
	let start = json.get("start").and_then(Value::as_i64);
	let end = json.get("end").and_then(Value::as_i64);
	let location = match (chromosome.as_deref(), start, end) {
		(Some(chromosome), Some(start), Some(end)) => {
			let strand = match json.get("strand").and_then(Value::as_i64) {
				Some(-1) => ":-1",
				Some(1) => ":1",
				_ => "",
			};

			Some(format!("{chromosome}:{start}-{end}{strand}"))
		},
		_ => None,
	};

	GeneRecord {
		id: id.to_string(),
		symbol: text("display_name").unwrap_or_default(),
		description: text("description").unwrap_or_else(|| "No description available".to_string()),
		summary: None,
		organism: text("species"),
		chromosome,
		location,
		function: None,
		biotype: text("biotype"),
	}
}
