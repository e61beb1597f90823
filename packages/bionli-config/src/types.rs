use serde::Deserialize;

use crate::knowledge::Knowledge;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub sources: Sources,
	pub dispatch: Dispatch,
	pub history: History,
	#[serde(default)]
	pub recognizer: Recognizer,
	#[serde(default)]
	pub knowledge: Knowledge,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Sources {
	pub ncbi: NcbiSource,
	pub ensembl: EnsemblSource,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NcbiSource {
	/// E-utilities base, e.g. "https://eutils.ncbi.nlm.nih.gov/entrez/eutils".
	pub api_base: String,
	/// Optional. Raises the NCBI rate limit when present.
	pub api_key: Option<String>,
	pub timeout_ms: u64,
	/// Upper bound on gene ids taken from a single esearch.
	pub max_results: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EnsemblSource {
	#[serde(default = "default_true")]
	pub enabled: bool,
	pub api_base: String,
	pub timeout_ms: u64,
	pub max_results: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Dispatch {
	/// Hard bound on a single outbound knowledge-source call, retries included.
	pub call_timeout_ms: u64,
	pub max_retries: u32,
	pub retry_backoff_ms: u64,
	pub immune_gene_limit: usize,
	pub cancer_gene_limit: usize,
}

#[derive(Clone, Debug, Deserialize)]
pub struct History {
	/// Number of most recent entries returned by a history read.
	pub window: usize,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Recognizer {
	#[serde(default)]
	pub lexicon: Vec<LexiconEntry>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LexiconEntry {
	pub term: String,
	/// One of gene, protein, organism, or cell_type.
	pub category: String,
}

fn default_true() -> bool {
	true
}
