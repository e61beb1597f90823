//! Read-only lookup tables built from `[knowledge]` configuration.

use std::collections::{BTreeMap, HashMap};

use bionli_config::{FunctionSummary, HomologEntry, Knowledge, Pathway, PathwayEntry};

#[derive(Clone, Debug)]
pub struct HomologTable {
	entries: HashMap<String, BTreeMap<String, String>>,
	order: Vec<String>,
}
impl HomologTable {
	pub fn new(entries: &[HomologEntry]) -> Self {
		let mut map = HashMap::new();
		let mut order = Vec::new();

		for entry in entries {
			let key = entry.symbol.to_uppercase();

			if map.insert(key.clone(), entry.orthologs.clone()).is_none() {
				order.push(key);
			}
		}

		Self { entries: map, order }
	}

	/// Symbol of `symbol`'s ortholog in `target_species`, if the table knows one.
	pub fn lookup(&self, symbol: &str, target_species: &str) -> Option<&str> {
		self.entries
			.get(&symbol.to_uppercase())
			.and_then(|orthologs| orthologs.get(target_species))
			.map(String::as_str)
	}

	/// Human-readable sample mappings, e.g. `TP53 -> Trp53 (mouse)`.
	pub fn examples(&self, target_species: &str, limit: usize) -> Vec<String> {
		self.order
			.iter()
			.filter_map(|symbol| {
				self.lookup(symbol, target_species)
					.map(|homolog| format!("{symbol} -> {homolog} ({target_species})"))
			})
			.take(limit)
			.collect()
	}
}

#[derive(Clone, Debug)]
pub struct PathwayTable {
	entries: HashMap<String, Vec<Pathway>>,
	fallback: Vec<Pathway>,
}
impl PathwayTable {
	pub fn new(entries: &[PathwayEntry], fallback: &[Pathway]) -> Self {
		let entries = entries
			.iter()
			.map(|entry| (entry.symbol.to_uppercase(), entry.pathways.clone()))
			.collect();

		Self { entries, fallback: fallback.to_vec() }
	}

	/// Pathways for `symbol`, or the generic fallback list for unknown symbols.
	pub fn lookup(&self, symbol: &str) -> &[Pathway] {
		match self.entries.get(&symbol.to_uppercase()) {
			Some(pathways) if !pathways.is_empty() => pathways,
			_ => &self.fallback,
		}
	}
}

#[derive(Clone, Debug)]
pub struct FunctionTable {
	entries: HashMap<String, String>,
}
impl FunctionTable {
	pub fn new(entries: &[FunctionSummary]) -> Self {
		Self {
			entries: entries
				.iter()
				.map(|entry| (entry.symbol.to_uppercase(), entry.summary.clone()))
				.collect(),
		}
	}

	pub fn summary(&self, symbol: &str) -> String {
		match self.entries.get(&symbol.to_uppercase()) {
			Some(summary) => summary.clone(),
			None => format!(
				"{symbol} is a gene with various biological functions. Check specific databases for detailed information."
			),
		}
	}
}

/// All static tables the resolution layer consults.
#[derive(Clone, Debug)]
pub struct KnowledgeTables {
	pub homologs: HomologTable,
	pub pathways: PathwayTable,
	pub functions: FunctionTable,
}
impl KnowledgeTables {
	pub fn from_config(knowledge: &Knowledge) -> Self {
		Self {
			homologs: HomologTable::new(&knowledge.homologs),
			pathways: PathwayTable::new(&knowledge.pathways, &knowledge.fallback_pathways),
			functions: FunctionTable::new(&knowledge.function_summaries),
		}
	}
}
impl Default for KnowledgeTables {
	fn default() -> Self {
		Self::from_config(&Knowledge::default())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn homolog_lookup_is_case_insensitive_on_symbol() {
		let tables = KnowledgeTables::default();

		assert_eq!(tables.homologs.lookup("tp53", "mouse"), Some("Trp53"));
		assert_eq!(tables.homologs.lookup("INS", "rat"), Some("Ins"));
		assert_eq!(tables.homologs.lookup("TP53", "yeast"), None);
		assert_eq!(tables.homologs.lookup("ZZZFAKE1", "mouse"), None);
	}

	#[test]
	fn homolog_examples_follow_table_order() {
		let tables = KnowledgeTables::default();
		let examples = tables.homologs.examples("mouse", 2);

		assert_eq!(examples, vec!["TP53 -> Trp53 (mouse)", "BRCA1 -> Brca1 (mouse)"]);
	}

	#[test]
	fn unknown_symbol_gets_fallback_pathways() {
		let tables = KnowledgeTables::default();
		let pathways = tables.pathways.lookup("ZZZFAKE1");

		assert_eq!(pathways.len(), 3);
		assert_eq!(pathways[0].name, "Common cellular pathways");
		assert_eq!(tables.pathways.lookup("egfr")[1].name, "MAPK signaling pathway");
	}

	#[test]
	fn unknown_symbol_gets_generic_summary() {
		let tables = KnowledgeTables::default();

		assert!(tables.functions.summary("ZZZFAKE1").starts_with("ZZZFAKE1 is a gene"));
		assert!(tables.functions.summary("TP53").contains("tumor suppressor"));
	}
}
