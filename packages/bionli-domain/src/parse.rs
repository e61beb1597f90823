use std::{collections::BTreeSet, sync::Arc};

use regex::{Captures, Regex};
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use bionli_config::Config;

use crate::{
	Result,
	classify::{QueryClassifier, QueryType},
	concept::{ConceptExtractor, ConceptSet},
	confidence,
	entity::{self, Entities, EntityExtractor},
	error,
	recognizer::{LexiconRecognizer, NoopRecognizer, Recognizer},
	species::SpeciesNormalizer,
};

const CANONICAL_TERMS: &str = r"(?i)\b(dna|rna|mrna|trna|insulin)\b";
const GENERIC_NOUNS: [&str; 3] = ["gene", "protein", "sequence"];

/// Structured intent for one query. Built once per request and never mutated.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParseResult {
	pub original_query: String,
	pub normalized_query: String,
	pub entities: Entities,
	pub concepts: ConceptSet,
	pub query_type: QueryType,
	pub confidence: f32,
	pub keywords: BTreeSet<String>,
}

pub struct ParsePipeline {
	entities: EntityExtractor,
	concepts: ConceptExtractor,
	classifier: QueryClassifier,
	canonical_terms: Regex,
}
impl ParsePipeline {
	pub fn new(recognizer: Arc<dyn Recognizer>, species: SpeciesNormalizer) -> Result<Self> {
		Ok(Self {
			entities: EntityExtractor::new(recognizer, species)?,
			concepts: ConceptExtractor::new()?,
			classifier: QueryClassifier::new()?,
			canonical_terms: error::compile("normalization", CANONICAL_TERMS)?,
		})
	}

	pub fn pattern_only() -> Result<Self> {
		Self::new(Arc::new(NoopRecognizer), SpeciesNormalizer::default())
	}

	/// Uses a lexicon recognizer when `[recognizer].lexicon` has entries.
	pub fn from_config(cfg: &Config) -> Result<Self> {
		let species = SpeciesNormalizer::new(&cfg.knowledge.species);
		let lexicon = LexiconRecognizer::new(&cfg.recognizer.lexicon)?;
		let recognizer: Arc<dyn Recognizer> =
			if lexicon.is_empty() { Arc::new(NoopRecognizer) } else { Arc::new(lexicon) };

		Self::new(recognizer, species)
	}

	pub fn parse(&self, query: &str) -> ParseResult {
		let entities = self.entities.extract(query);
		let concepts = self.concepts.extract(query);
		let query_type = self.classifier.classify(query, &concepts, &entities);
		let confidence = confidence::score(&entities, query_type, &concepts);

		ParseResult {
			original_query: query.to_string(),
			normalized_query: self.normalize_query(query),
			keywords: keywords(query),
			entities,
			concepts,
			query_type,
			confidence,
		}
	}

	pub fn extract_entities(&self, text: &str) -> Entities {
		self.entities.extract(text)
	}

	/// NFKC, collapsed whitespace, and canonical spelling for a few common terms.
	pub fn normalize_query(&self, query: &str) -> String {
		let folded: String = query.nfkc().collect();
		let collapsed = folded.split_whitespace().collect::<Vec<_>>().join(" ");

		self.canonical_terms
			.replace_all(&collapsed, |caps: &Captures| match caps[1].to_lowercase().as_str() {
				"dna" => "DNA",
				"rna" => "RNA",
				"mrna" => "mRNA",
				"trna" => "tRNA",
				_ => "INS",
			})
			.into_owned()
	}
}

/// Distinct lower-case words longer than two characters, minus stop words and generic nouns.
pub fn keywords(text: &str) -> BTreeSet<String> {
	text.unicode_words()
		.map(str::to_lowercase)
		.filter(|word| word.chars().count() > 2)
		.filter(|word| !entity::is_stop_word(word) && !GENERIC_NOUNS.contains(&word.as_str()))
		.collect()
}
