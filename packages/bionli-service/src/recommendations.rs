//! Follow-up material attached to a query response: tool pointers, pathways, next questions.

use serde::Serialize;

use bionli_config::Pathway;
use bionli_domain::{ParseResult, QueryType, knowledge::KnowledgeTables};

const PATHWAY_SOURCES: [&str; 3] = ["KEGG", "Reactome", "WikiPathways"];

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServiceRecommendation {
	Blast {
		gene: String,
		message: String,
		recommendation: String,
		direct_link: String,
		note: String,
	},
	Pathways {
		gene: String,
		pathways: Vec<Pathway>,
		sources: Vec<String>,
		direct_links: Vec<String>,
	},
	FunctionSummary {
		gene: String,
		summary: String,
	},
}

/// BLAST pointers for homology questions; pathways and a function summary for function questions.
pub fn recommend(parsed: &ParseResult, tables: &KnowledgeTables) -> Vec<ServiceRecommendation> {
	let genes = parsed.entities.genes();

	match parsed.query_type {
		QueryType::Homology => genes.iter().map(|gene| blast(&gene.text)).collect(),
		QueryType::Function => genes
			.iter()
			.flat_map(|gene| {
				let symbol = gene.symbol();

				[
					ServiceRecommendation::Pathways {
						gene: gene.text.clone(),
						pathways: tables.pathways.lookup(symbol).to_vec(),
						sources: PATHWAY_SOURCES.map(String::from).to_vec(),
						direct_links: vec![
							format!("https://www.genome.jp/dbget-bin/www_bget?{symbol}"),
							format!("https://reactome.org/content/query?q={symbol}"),
						],
					},
					ServiceRecommendation::FunctionSummary {
						gene: gene.text.clone(),
						summary: tables.functions.summary(symbol),
					},
				]
			})
			.collect(),
		_ => Vec::new(),
	}
}

fn blast(gene: &str) -> ServiceRecommendation {
	ServiceRecommendation::Blast {
		gene: gene.to_string(),
		message: "BLAST analysis available through NCBI.".to_string(),
		recommendation: "Use NCBI BLAST for sequence homology analysis.".to_string(),
		direct_link: format!(
			"https://blast.ncbi.nlm.nih.gov/Blast.cgi?PROGRAM=blastn&PAGE_TYPE=BlastSearch&QUERY={gene}"
		),
		note: "For protein sequences, use blastp instead of blastn.".to_string(),
	}
}

/// Four follow-up questions about the first gene, or none when no gene was found.
pub fn suggest(parsed: &ParseResult) -> Vec<String> {
	let Some(gene) = parsed.entities.genes().first() else {
		return Vec::new();
	};
	let gene = &gene.text;

	vec![
		format!("What is the function of {gene}?"),
		format!("Show me interactions for {gene}"),
		format!("Where is {gene} expressed?"),
		format!("Get the sequence of {gene}"),
	]
}
