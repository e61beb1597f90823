use std::collections::BTreeMap;

use regex::Regex;
use serde::Serialize;

use crate::{Result, error};

const CONCEPT_KEYWORDS: [(Concept, &[&str]); 10] = [
	(
		Concept::Homology,
		&[
			"homolog",
			"homologs",
			"homologous",
			"ortholog",
			"orthologs",
			"orthologous",
			"paralog",
			"paralogs",
			"equivalent",
			"counterpart",
			"version",
			"equivalent gene",
			"similar gene",
			"related gene",
		],
	),
	(
		Concept::Immune,
		&[
			"immune",
			"immunity",
			"immunological",
			"lymphocyte",
			"t-cell",
			"b-cell",
			"antibody",
			"antigen",
		],
	),
	(
		Concept::Virus,
		&[
			"virus",
			"viruses",
			"viral",
			"virion",
			"bacteriophage",
			"retrovirus",
			"hiv",
			"influenza",
			"coronavirus",
		],
	),
	(
		Concept::Cancer,
		&["cancer", "tumor", "oncogene", "tumor suppressor", "carcinoma", "sarcoma", "leukemia"],
	),
	(
		Concept::Expression,
		&["expression", "expressed", "transcription", "translation", "mrna", "rna", "transcript"],
	),
	(
		Concept::Interaction,
		&["interaction", "interact", "binding", "complex", "dimer", "multimer", "association"],
	),
	(Concept::Pathway, &["pathway", "signaling", "cascade", "network", "circuit", "regulation"]),
	(
		Concept::Structure,
		&["structure", "domain", "motif", "fold", "conformation", "tertiary", "secondary"],
	),
	(
		Concept::Function,
		&["function", "role", "purpose", "activity", "mechanism", "effect", "action"],
	),
	(
		Concept::Sequence,
		&[
			"sequence",
			"dna sequence",
			"protein sequence",
			"nucleotide sequence",
			"amino acid sequence",
		],
	),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Concept {
	Homology,
	Immune,
	Virus,
	Cancer,
	Expression,
	Interaction,
	Pathway,
	Structure,
	Function,
	Sequence,
}

/// Detected concepts with the keywords that triggered them. Absent keys were not detected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConceptSet(BTreeMap<Concept, Vec<String>>);
impl ConceptSet {
	pub fn has(&self, concept: Concept) -> bool {
		self.0.get(&concept).is_some_and(|keywords| !keywords.is_empty())
	}

	pub fn keywords(&self, concept: Concept) -> &[String] {
		self.0.get(&concept).map(Vec::as_slice).unwrap_or_default()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn concepts(&self) -> impl Iterator<Item = Concept> + '_ {
		self.0.keys().copied()
	}
}
impl FromIterator<(Concept, Vec<String>)> for ConceptSet {
	fn from_iter<I: IntoIterator<Item = (Concept, Vec<String>)>>(iter: I) -> Self {
		Self(iter.into_iter().filter(|(_, keywords)| !keywords.is_empty()).collect())
	}
}

pub struct ConceptExtractor {
	table: Vec<(Concept, Vec<(&'static str, Regex)>)>,
}
impl ConceptExtractor {
	pub fn new() -> Result<Self> {
		let mut table = Vec::with_capacity(CONCEPT_KEYWORDS.len());

		for (concept, keywords) in CONCEPT_KEYWORDS {
			let mut compiled = Vec::with_capacity(keywords.len());

			for keyword in keywords {
				let pattern = format!(r"\b{}\b", regex::escape(keyword));

				compiled.push((*keyword, error::compile("concept", &pattern)?));
			}

			table.push((concept, compiled));
		}

		Ok(Self { table })
	}

	pub fn extract(&self, text: &str) -> ConceptSet {
		let lower = text.to_lowercase();

		self.table
			.iter()
			.map(|(concept, keywords)| {
				let matched = keywords
					.iter()
					.filter(|(_, regex)| regex.is_match(&lower))
					.map(|(keyword, _)| keyword.to_string())
					.collect();

				(*concept, matched)
			})
			.collect()
	}
}
