mod error;
mod knowledge;
mod types;

pub use error::{Error, Result};
pub use knowledge::{FunctionSummary, HomologEntry, Knowledge, Pathway, PathwayEntry, SpeciesAlias};
pub use types::{
	Config, Dispatch, EnsemblSource, History, LexiconEntry, NcbiSource, Recognizer, Service,
	Sources,
};

use std::{collections::HashSet, fs, path::Path};

/// Categories a lexicon entry may carry.
pub const LEXICON_CATEGORIES: [&str; 4] = ["gene", "protein", "organism", "cell_type"];

const MAX_RETRIES: u32 = 3;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}

	for (label, base) in [
		("sources.ncbi.api_base", &cfg.sources.ncbi.api_base),
		("sources.ensembl.api_base", &cfg.sources.ensembl.api_base),
	] {
		if !(base.starts_with("http://") || base.starts_with("https://")) {
			return Err(Error::Validation {
				message: format!("{label} must start with http:// or https://."),
			});
		}
	}
	for (label, value) in [
		("sources.ncbi.timeout_ms", cfg.sources.ncbi.timeout_ms),
		("sources.ensembl.timeout_ms", cfg.sources.ensembl.timeout_ms),
		("dispatch.call_timeout_ms", cfg.dispatch.call_timeout_ms),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	if cfg.sources.ncbi.max_results == 0 {
		return Err(Error::Validation {
			message: "sources.ncbi.max_results must be greater than zero.".to_string(),
		});
	}
	if cfg.sources.ensembl.max_results == 0 {
		return Err(Error::Validation {
			message: "sources.ensembl.max_results must be greater than zero.".to_string(),
		});
	}
	if cfg.dispatch.max_retries > MAX_RETRIES {
		return Err(Error::Validation {
			message: format!("dispatch.max_retries must be {MAX_RETRIES} or less."),
		});
	}
	if cfg.dispatch.immune_gene_limit == 0 || cfg.dispatch.cancer_gene_limit == 0 {
		return Err(Error::Validation {
			message: "dispatch gene limits must be greater than zero.".to_string(),
		});
	}
	if cfg.history.window == 0 {
		return Err(Error::Validation {
			message: "history.window must be greater than zero.".to_string(),
		});
	}

	for entry in &cfg.recognizer.lexicon {
		if !LEXICON_CATEGORIES.contains(&entry.category.as_str()) {
			return Err(Error::Validation {
				message: format!(
					"recognizer.lexicon category {:?} must be one of gene, protein, organism, or cell_type.",
					entry.category
				),
			});
		}
	}

	validate_knowledge(&cfg.knowledge)
}

fn validate_knowledge(knowledge: &Knowledge) -> Result<()> {
	let mut seen = HashSet::new();

	for entry in &knowledge.homologs {
		if !seen.insert(entry.symbol.to_uppercase()) {
			return Err(Error::Knowledge {
				table: "homologs",
				message: format!("Symbol {} is listed more than once.", entry.symbol),
			});
		}
		if entry.orthologs.is_empty() {
			return Err(Error::Knowledge {
				table: "homologs",
				message: format!("Symbol {} must map at least one species.", entry.symbol),
			});
		}
	}

	seen.clear();

	for entry in &knowledge.pathways {
		if !seen.insert(entry.symbol.to_uppercase()) {
			return Err(Error::Knowledge {
				table: "pathways",
				message: format!("Symbol {} is listed more than once.", entry.symbol),
			});
		}
		if entry.pathways.is_empty() {
			return Err(Error::Knowledge {
				table: "pathways",
				message: format!("Symbol {} must list at least one pathway.", entry.symbol),
			});
		}
	}

	if knowledge.fallback_pathways.is_empty() {
		return Err(Error::Knowledge {
			table: "fallback_pathways",
			message: "At least one fallback pathway is required.".to_string(),
		});
	}
	if knowledge.immune_genes.is_empty() {
		return Err(Error::Knowledge {
			table: "immune_genes",
			message: "The immune gene panel must be non-empty.".to_string(),
		});
	}
	if knowledge.cancer_genes.is_empty() {
		return Err(Error::Knowledge {
			table: "cancer_genes",
			message: "The cancer gene panel must be non-empty.".to_string(),
		});
	}

	for alias in &knowledge.species {
		if alias.key.trim().is_empty() || alias.key != alias.key.to_lowercase() {
			return Err(Error::Knowledge {
				table: "species",
				message: format!("Species {} must have a lowercase key.", alias.name),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.sources.ncbi.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.sources.ncbi.api_key = None;
	}

	for base in [&mut cfg.sources.ncbi.api_base, &mut cfg.sources.ensembl.api_base] {
		while base.ends_with('/') {
			base.pop();
		}
	}

	cfg.recognizer.lexicon.retain(|entry| !entry.term.trim().is_empty());

	for entry in &mut cfg.recognizer.lexicon {
		entry.category = entry.category.trim().to_lowercase();
	}
}
