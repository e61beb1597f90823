//! Static lookup tables consumed by the resolution layer.
//!
//! Every table has a built-in default so a config file only needs a `[knowledge]` section to
//! override or extend what ships with the binary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize)]
pub struct Knowledge {
	#[serde(default = "default_homologs")]
	pub homologs: Vec<HomologEntry>,
	#[serde(default = "default_pathways")]
	pub pathways: Vec<PathwayEntry>,
	/// Returned for any symbol without a `pathways` entry.
	#[serde(default = "default_fallback_pathways")]
	pub fallback_pathways: Vec<Pathway>,
	#[serde(default = "default_function_summaries")]
	pub function_summaries: Vec<FunctionSummary>,
	/// Ordered panel queried for immune/virus interaction questions.
	#[serde(default = "default_immune_genes")]
	pub immune_genes: Vec<String>,
	/// Ordered panel queried for cancer gene questions.
	#[serde(default = "default_cancer_genes")]
	pub cancer_genes: Vec<String>,
	#[serde(default = "default_species")]
	pub species: Vec<SpeciesAlias>,
}
impl Default for Knowledge {
	fn default() -> Self {
		Self {
			homologs: default_homologs(),
			pathways: default_pathways(),
			fallback_pathways: default_fallback_pathways(),
			function_summaries: default_function_summaries(),
			immune_genes: default_immune_genes(),
			cancer_genes: default_cancer_genes(),
			species: default_species(),
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct HomologEntry {
	pub symbol: String,
	/// Species key (see [`SpeciesAlias::key`]) to the symbol used in that species.
	pub orthologs: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PathwayEntry {
	pub symbol: String,
	pub pathways: Vec<Pathway>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct Pathway {
	pub name: String,
	pub source: String,
	pub category: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FunctionSummary {
	pub symbol: String,
	pub summary: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SpeciesAlias {
	/// Surface form as written in a question, matched case-insensitively.
	pub name: String,
	pub scientific_name: String,
	/// Canonical lowercase key used by homolog lookups.
	pub key: String,
}

fn pathway(name: &str, source: &str, category: &str) -> Pathway {
	Pathway { name: name.to_string(), source: source.to_string(), category: category.to_string() }
}

fn homolog(symbol: &str, human: &str, mouse: &str, rat: &str) -> HomologEntry {
	let orthologs = BTreeMap::from([
		("human".to_string(), human.to_string()),
		("mouse".to_string(), mouse.to_string()),
		("rat".to_string(), rat.to_string()),
	]);

	HomologEntry { symbol: symbol.to_string(), orthologs }
}

fn species(name: &str, scientific_name: &str, key: &str) -> SpeciesAlias {
	SpeciesAlias {
		name: name.to_string(),
		scientific_name: scientific_name.to_string(),
		key: key.to_string(),
	}
}

fn default_homologs() -> Vec<HomologEntry> {
	vec![
		homolog("TP53", "TP53", "Trp53", "Trp53"),
		homolog("BRCA1", "BRCA1", "Brca1", "Brca1"),
		homolog("BRCA2", "BRCA2", "Brca2", "Brca2"),
		homolog("EGFR", "EGFR", "Egfr", "Egfr"),
		homolog("MYC", "MYC", "Myc", "Myc"),
		homolog("KRAS", "KRAS", "Kras", "Kras"),
		homolog("AKT1", "AKT1", "Akt1", "Akt1"),
		homolog("PTEN", "PTEN", "Pten", "Pten"),
		homolog("VEGF", "VEGFA", "Vegfa", "Vegfa"),
		homolog("INS", "INS", "Ins1", "Ins"),
		homolog("HBB", "HBB", "Hbb", "Hbb"),
	]
}

fn default_pathways() -> Vec<PathwayEntry> {
	vec![
		PathwayEntry {
			symbol: "TP53".to_string(),
			pathways: vec![
				pathway("p53 signaling pathway", "KEGG", "Cell cycle"),
				pathway("Apoptosis", "Reactome", "Cell death"),
				pathway("DNA damage response", "WikiPathways", "DNA repair"),
			],
		},
		PathwayEntry {
			symbol: "BRCA1".to_string(),
			pathways: vec![
				pathway("DNA repair", "KEGG", "DNA damage response"),
				pathway("Cell cycle checkpoints", "Reactome", "Cell cycle"),
				pathway("Hereditary breast cancer", "WikiPathways", "Cancer"),
			],
		},
		PathwayEntry {
			symbol: "EGFR".to_string(),
			pathways: vec![
				pathway("EGFR tyrosine kinase inhibitor resistance", "KEGG", "Cancer"),
				pathway("MAPK signaling pathway", "Reactome", "Signaling"),
				pathway("ErbB signaling pathway", "WikiPathways", "Signaling"),
			],
		},
		PathwayEntry {
			symbol: "HBB".to_string(),
			pathways: vec![
				pathway("Oxygen transport", "Reactome", "Metabolism"),
				pathway("Heme biosynthesis", "KEGG", "Biosynthesis"),
				pathway("Erythrocyte development", "WikiPathways", "Development"),
			],
		},
		PathwayEntry {
			symbol: "INS".to_string(),
			pathways: vec![
				pathway("Insulin signaling pathway", "KEGG", "Metabolism"),
				pathway("Glucose metabolism", "Reactome", "Metabolism"),
				pathway("Type II diabetes", "WikiPathways", "Disease"),
			],
		},
		PathwayEntry {
			symbol: "CFTR".to_string(),
			pathways: vec![
				pathway("Chloride ion transport", "Reactome", "Transport"),
				pathway("Cystic fibrosis pathway", "KEGG", "Disease"),
				pathway("Ion channel regulation", "WikiPathways", "Signaling"),
			],
		},
		PathwayEntry {
			symbol: "VEGF".to_string(),
			pathways: vec![
				pathway("VEGF signaling pathway", "KEGG", "Angiogenesis"),
				pathway("Blood vessel development", "Reactome", "Development"),
				pathway("Hypoxia response", "WikiPathways", "Stress response"),
			],
		},
	]
}

fn default_fallback_pathways() -> Vec<Pathway> {
	vec![
		pathway("Common cellular pathways", "Multiple databases", "General"),
		pathway("Metabolic pathways", "KEGG", "Metabolism"),
		pathway("Signal transduction", "Reactome", "Signaling"),
	]
}

fn default_function_summaries() -> Vec<FunctionSummary> {
	[
		(
			"TP53",
			"Tumor protein p53, a tumor suppressor that regulates the cell cycle and prevents cancer development.",
		),
		(
			"BRCA1",
			"Breast cancer type 1 susceptibility protein, involved in DNA repair and genomic stability.",
		),
		(
			"EGFR",
			"Epidermal growth factor receptor, a cell surface receptor that regulates cell growth and division.",
		),
		(
			"HBB",
			"Hemoglobin subunit beta, part of the oxygen-carrying protein that moves oxygen from lungs to tissues.",
		),
		(
			"INS",
			"Insulin, a peptide hormone produced by the pancreas that regulates glucose metabolism.",
		),
		(
			"CFTR",
			"Cystic fibrosis transmembrane conductance regulator, a chloride channel important for fluid transport.",
		),
		(
			"VEGF",
			"Vascular endothelial growth factor, which stimulates blood vessel formation (angiogenesis).",
		),
	]
	.into_iter()
	.map(|(symbol, summary)| FunctionSummary {
		symbol: symbol.to_string(),
		summary: summary.to_string(),
	})
	.collect()
}

fn default_immune_genes() -> Vec<String> {
	[
		"TLR3", "TLR7", "TLR8", "TLR9", "RIGI", "MDA5", "MAVS", "IRF3", "IRF7", "STAT1", "STAT2",
		"IFIT1", "IFIT2", "IFIT3", "OAS1", "PKR", "MX1",
	]
	.into_iter()
	.map(str::to_string)
	.collect()
}

fn default_cancer_genes() -> Vec<String> {
	["TP53", "BRCA1", "BRCA2", "EGFR", "KRAS", "PTEN", "AKT1", "MYC"]
		.into_iter()
		.map(str::to_string)
		.collect()
}

fn default_species() -> Vec<SpeciesAlias> {
	vec![
		species("human", "Homo sapiens", "human"),
		species("homo sapiens", "Homo sapiens", "human"),
		species("mouse", "Mus musculus", "mouse"),
		species("mice", "Mus musculus", "mouse"),
		species("mus", "Mus musculus", "mouse"),
		species("mus musculus", "Mus musculus", "mouse"),
		species("rat", "Rattus norvegicus", "rat"),
		species("rattus", "Rattus norvegicus", "rat"),
		species("rattus norvegicus", "Rattus norvegicus", "rat"),
		species("yeast", "Saccharomyces cerevisiae", "yeast"),
		species("saccharomyces", "Saccharomyces cerevisiae", "yeast"),
		species("cerevisiae", "Saccharomyces cerevisiae", "yeast"),
		species("ecoli", "Escherichia coli", "ecoli"),
		species("escherichia coli", "Escherichia coli", "ecoli"),
		species("drosophila", "Drosophila melanogaster", "fly"),
	]
}
