//! In-process knowledge sources and a fixed configuration for tests. Nothing here touches the
//! network.

mod error;

pub use error::{Error, Result};

use std::{
	collections::HashMap,
	sync::{Arc, Mutex},
	time::Duration,
};

use color_eyre::eyre;
use tokio::time;

use bionli_config::Config;
use bionli_providers::GeneRecord;
use bionli_service::{BioNliService, BoxFuture, GeneLookup, Sources};

const TEST_CONFIG: &str = r#"
[service]
http_bind = "127.0.0.1:0"
log_level = "debug"

[sources.ncbi]
api_base    = "http://127.0.0.1:9/ncbi"
timeout_ms  = 1000
max_results = 3

[sources.ensembl]
enabled     = true
api_base    = "http://127.0.0.1:9/ensembl"
timeout_ms  = 1000
max_results = 2

[dispatch]
call_timeout_ms   = 200
max_retries       = 0
retry_backoff_ms  = 10
immune_gene_limit = 5
cancer_gene_limit = 4

[history]
window = 10
"#;

/// A validated configuration with built-in knowledge tables and unreachable source URLs.
pub fn test_config() -> Result<Config> {
	let cfg: Config = toml::from_str(TEST_CONFIG)?;

	bionli_config::validate(&cfg)?;

	Ok(cfg)
}

/// A minimal record for `symbol`, shaped like an NCBI answer.
pub fn gene(symbol: &str, description: &str) -> GeneRecord {
	GeneRecord {
		id: format!("stub-{symbol}"),
		symbol: symbol.to_string(),
		description: description.to_string(),
		organism: Some("Homo sapiens".to_string()),
		..Default::default()
	}
}

/// Answers from a fixed symbol table and records every call as `(symbol, organism)`.
pub struct StubLookup {
	source: String,
	genes: HashMap<String, Vec<GeneRecord>>,
	calls: Mutex<Vec<(String, String)>>,
}
impl StubLookup {
	pub fn new(source: &str) -> Self {
		Self { source: source.to_string(), genes: HashMap::new(), calls: Mutex::new(Vec::new()) }
	}

	pub fn with_gene(mut self, record: GeneRecord) -> Self {
		self.genes.entry(record.symbol.to_uppercase()).or_default().push(record);

		self
	}

	pub fn calls(&self) -> Vec<(String, String)> {
		self.calls.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}

impl GeneLookup for StubLookup {
	fn source(&self) -> &str {
		&self.source
	}

	fn find<'a>(
		&'a self,
		symbol: &'a str,
		organism: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<GeneRecord>>> {
		Box::pin(async move {
			self.calls
				.lock()
				.unwrap_or_else(|err| err.into_inner())
				.push((symbol.to_string(), organism.to_string()));

			Ok(self.genes.get(&symbol.to_uppercase()).cloned().unwrap_or_default())
		})
	}
}

/// Fails every call, like a source that is down.
pub struct FailingLookup {
	source: String,
}
impl FailingLookup {
	pub fn new(source: &str) -> Self {
		Self { source: source.to_string() }
	}
}

impl GeneLookup for FailingLookup {
	fn source(&self) -> &str {
		&self.source
	}

	fn find<'a>(
		&'a self,
		symbol: &'a str,
		_organism: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<GeneRecord>>> {
		Box::pin(async move { Err(eyre::eyre!("{} refused the lookup for {symbol}.", self.source)) })
	}
}

/// Sleeps for `delay` before answering with nothing. Used to trip the dispatch timeout.
pub struct SlowLookup {
	source: String,
	delay: Duration,
}
impl SlowLookup {
	pub fn new(source: &str, delay: Duration) -> Self {
		Self { source: source.to_string(), delay }
	}
}

impl GeneLookup for SlowLookup {
	fn source(&self) -> &str {
		&self.source
	}

	fn find<'a>(
		&'a self,
		_symbol: &'a str,
		_organism: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<GeneRecord>>> {
		Box::pin(async move {
			time::sleep(self.delay).await;

			Ok(Vec::new())
		})
	}
}

/// A service over `primary` alone, built from [`test_config`].
pub fn service_with(primary: Arc<dyn GeneLookup>) -> Result<BioNliService> {
	service_with_sources(Sources::new(primary, Vec::new()))
}

pub fn service_with_sources(sources: Sources) -> Result<BioNliService> {
	Ok(BioNliService::with_sources(test_config()?, sources)?)
}

/// NCBI-like stub that knows TP53, its mouse ortholog, INS, and the first cancer panel genes.
pub fn reference_lookup() -> StubLookup {
	StubLookup::new("NCBI Gene")
		.with_gene(gene("TP53", "tumor protein p53"))
		.with_gene(gene("Trp53", "transformation related protein 53"))
		.with_gene(gene("INS", "insulin"))
		.with_gene(gene("BRCA1", "BRCA1 DNA repair associated"))
		.with_gene(gene("EGFR", "epidermal growth factor receptor"))
}
