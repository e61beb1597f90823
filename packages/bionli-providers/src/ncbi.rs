use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use bionli_config::NcbiSource;

use crate::{Error, GeneRecord, Result, RetryPolicy};

pub const SOURCE_NAME: &str = "NCBI Gene";

const FUNCTION_MIN_SUMMARY_CHARS: usize = 50;
const FUNCTION_MAX_CHARS: usize = 200;
const FUNCTION_UNAVAILABLE: &str = "Functional information not available in summary";

/// NCBI E-utilities gene search (`esearch` followed by `esummary`).
#[derive(Clone, Debug)]
pub struct NcbiClient {
	client: Client,
	cfg: NcbiSource,
	retry: RetryPolicy,
}
impl NcbiClient {
	pub fn new(cfg: &NcbiSource, retry: RetryPolicy) -> Result<Self> {
		let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;

		Ok(Self { client, cfg: cfg.clone(), retry })
	}

	/// Returns an empty list when NCBI has no gene for `symbol` in `organism`.
	pub async fn find_gene(&self, symbol: &str, organism: &str) -> Result<Vec<GeneRecord>> {
		let term = format!("{symbol}[Gene Name] AND {organism}[Organism]");
		let retmax = self.cfg.max_results.to_string();
		let mut params = vec![
			("db", "gene"),
			("term", term.as_str()),
			("retmode", "json"),
			("retmax", retmax.as_str()),
		];

		if let Some(key) = self.cfg.api_key.as_deref() {
			params.push(("api_key", key));
		}

		let search = self.get_json("esearch.fcgi", &params).await?;
		let ids = parse_search_ids(&search)?;

		if ids.is_empty() {
			tracing::debug!(symbol, organism, "NCBI esearch returned no gene ids.");

			return Ok(Vec::new());
		}

		let joined = ids.join(",");
		let mut params = vec![("db", "gene"), ("id", joined.as_str()), ("retmode", "json")];

		if let Some(key) = self.cfg.api_key.as_deref() {
			params.push(("api_key", key));
		}

		let summary = self.get_json("esummary.fcgi", &params).await?;

		parse_summaries(&summary, &ids)
	}

	async fn get_json(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value> {
		let url = format!("{}/{endpoint}", self.cfg.api_base);
		let res =
			crate::send_with_retry(SOURCE_NAME, self.retry, || self.client.get(&url).query(params))
				.await?;
		let status = res.status();

		if !status.is_success() {
			return Err(Error::Status { source_name: SOURCE_NAME, status: status.as_u16() });
		}

		Ok(res.json().await?)
	}
}

fn parse_search_ids(json: &Value) -> Result<Vec<String>> {
	let ids = json
		.get("esearchresult")
		.and_then(|result| result.get("idlist"))
		.and_then(Value::as_array)
		.ok_or_else(|| Error::InvalidResponse {
			message: "NCBI esearch response is missing esearchresult.idlist.".to_string(),
		})?;

	Ok(ids.iter().filter_map(Value::as_str).map(str::to_string).collect())
}

fn parse_summaries(json: &Value, ids: &[String]) -> Result<Vec<GeneRecord>> {
	let result = json.get("result").ok_or_else(|| Error::InvalidResponse {
		message: "NCBI esummary response is missing result.".to_string(),
	})?;
	let mut records = Vec::with_capacity(ids.len());

	for id in ids {
		let Some(info) = result.get(id) else {
			continue;
		};
		let text = |key: &str| crate::non_empty(info.get(key).and_then(Value::as_str));
		let summary = text("summary");

		records.push(GeneRecord {
			id: id.clone(),
			symbol: text("name").unwrap_or_default(),
			description: text("description").unwrap_or_default(),
			function: Some(function_from_summary(summary.as_deref())),
			summary,
			organism: crate::non_empty(
				info.get("organism")
					.and_then(|organism| organism.get("scientificname"))
					.and_then(Value::as_str),
			),
			chromosome: text("chromosome"),
			location: text("maplocation"),
			biotype: None,
		});
	}

	Ok(records)
}

/// First 200 characters of a substantive summary, or a fixed notice.
pub fn function_from_summary(summary: Option<&str>) -> String {
	let Some(summary) = summary.filter(|text| text.chars().count() > FUNCTION_MIN_SUMMARY_CHARS)
	else {
		return FUNCTION_UNAVAILABLE.to_string();
	};

	if summary.chars().count() <= FUNCTION_MAX_CHARS {
		return summary.to_string();
	}

	let mut truncated: String = summary.chars().take(FUNCTION_MAX_CHARS).collect();

	truncated.push_str("...");

	truncated
}
