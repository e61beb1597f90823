use std::{collections::BTreeMap, sync::Arc};

use regex::Regex;
use serde::Serialize;

use crate::{
	Result, error,
	recognizer::{NoopRecognizer, Recognizer},
	species::SpeciesNormalizer,
};

pub const RECOGNIZER_CONFIDENCE: f32 = 0.9;
pub const PATTERN_CONFIDENCE: f32 = 0.7;

/// Lower-case spellings accepted as gene names despite failing the all-caps shape.
pub const GENE_ALIAS_WHITELIST: [&str; 6] = ["p53", "p21", "p16", "p27", "insulin", "hemoglobin"];

const STOP_WORDS: &[&str] = &[
	"find", "search", "show", "tell", "get", "what", "which", "where", "when", "how", "why", "the",
	"a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "are", "is",
	"was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did", "can",
	"could", "will", "would", "should", "may", "might", "must", "me", "my", "your", "our",
	"their", "its", "this", "that", "these", "those", "here", "there", "very", "quite", "rather",
	"some", "any", "all", "both", "each", "every", "either", "neither", "version", "equivalent",
	"sequence", "sequences", "gene", "genes", "protein", "proteins", "list", "give", "explain",
	"describe", "about",
];
const GENE_COMMON_TERMS: &[&str] = &[
	"genes", "proteins", "homologs", "orthologs", "paralogs", "mutations", "variants", "alleles",
	"loci", "chromosomes", "sequence", "sequences", "gene", "protein", "which", "what", "where",
	"when", "how", "get", "show", "dna", "rna", "mrna",
];
const GENE_ALIASES: [(&str, &str); 5] = [
	("insulin", "INS"),
	("p53", "TP53"),
	("brca", "BRCA1"),
	("egf", "EGFR"),
	("hemoglobin", "HBB"),
];

// Scanned in this order; earlier buckets claim a surface text first. Species precede proteins
// so a capitalized "Mouse" stays a species.
const PATTERNS: [(EntityType, &str); 5] = [
	(
		EntityType::Gene,
		r"(?i)\b([A-Z][A-Z0-9]+[0-9]*|[A-Z]{1,4}[0-9]{1,5}[A-Z]?|p53|p21|p16|p27|insulin|hemoglobin)\b",
	),
	(
		EntityType::Species,
		r"(?i)\b(human|mouse|mice|rat|mus musculus|drosophila|yeast|saccharomyces|cerevisiae|ecoli|escherichia coli|homo sapiens|mus|rattus)\b",
	),
	(EntityType::Protein, r"\b([A-Z][a-z]{2,}[0-9]*[A-Z]?|[A-Z]{1,6}[0-9]{1,6})\b"),
	(EntityType::Identifier, r"\b([OPQ][0-9][A-Z0-9]{3}[0-9]|[A-NR-Z][0-9]([A-Z][A-Z0-9]{2}[0-9]){1,2})\b"),
	(EntityType::Identifier, r"\b(\d{1,10})\b"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
	Gene,
	Protein,
	Species,
	Identifier,
}
impl EntityType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Gene => "gene",
			Self::Protein => "protein",
			Self::Species => "species",
			Self::Identifier => "identifier",
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitySource {
	Recognizer,
	Pattern,
}

/// Byte offsets into the original query text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Span {
	pub start: usize,
	pub end: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Entity {
	pub text: String,
	pub span: Span,
	#[serde(rename = "type")]
	pub entity_type: EntityType,
	pub confidence: f32,
	pub source: EntitySource,
	pub normalized: Option<String>,
}
impl Entity {
	/// The form used for knowledge-source lookups.
	pub fn symbol(&self) -> &str {
		self.normalized.as_deref().unwrap_or(&self.text)
	}
}

/// Extracted entities grouped by type, each bucket ordered by descending confidence.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Entities(BTreeMap<EntityType, Vec<Entity>>);
impl Entities {
	pub fn of(&self, entity_type: EntityType) -> &[Entity] {
		self.0.get(&entity_type).map(Vec::as_slice).unwrap_or_default()
	}

	pub fn has(&self, entity_type: EntityType) -> bool {
		!self.of(entity_type).is_empty()
	}

	pub fn genes(&self) -> &[Entity] {
		self.of(EntityType::Gene)
	}

	pub fn first(&self, entity_type: EntityType) -> Option<&Entity> {
		self.of(entity_type).first()
	}

	pub fn is_empty(&self) -> bool {
		self.0.values().all(Vec::is_empty)
	}

	pub fn len(&self) -> usize {
		self.0.values().map(Vec::len).sum()
	}

	pub fn iter(&self) -> impl Iterator<Item = (EntityType, &[Entity])> {
		self.0.iter().map(|(entity_type, entities)| (*entity_type, entities.as_slice()))
	}

	fn contains_text(&self, text: &str) -> bool {
		self.0.values().flatten().any(|entity| entity.text == text)
	}

	fn push(&mut self, entity: Entity) {
		let bucket = self.0.entry(entity.entity_type).or_default();

		if bucket.iter().any(|existing| existing.text == entity.text) {
			return;
		}

		bucket.push(entity);
	}

	fn rank(&mut self) {
		for bucket in self.0.values_mut() {
			// `sort_by` is stable, so equal confidences keep scan order.
			bucket.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
		}
	}
}

pub struct EntityExtractor {
	recognizer: Arc<dyn Recognizer>,
	species: SpeciesNormalizer,
	patterns: Vec<(EntityType, Regex)>,
}
impl EntityExtractor {
	pub fn new(recognizer: Arc<dyn Recognizer>, species: SpeciesNormalizer) -> Result<Self> {
		let mut patterns = Vec::with_capacity(PATTERNS.len());

		for (entity_type, pattern) in PATTERNS {
			patterns.push((entity_type, error::compile(entity_type.as_str(), pattern)?));
		}

		Ok(Self { recognizer, species, patterns })
	}

	pub fn pattern_only(species: SpeciesNormalizer) -> Result<Self> {
		Self::new(Arc::new(NoopRecognizer), species)
	}

	pub fn extract(&self, text: &str) -> Entities {
		let mut entities = Entities::default();

		for span in self.recognizer.recognize(text) {
			let Some(entity_type) = span.category.entity_type() else {
				continue;
			};

			if !self.accepts(entity_type, &span.text) {
				continue;
			}

			let normalized = self.normalize(entity_type, &span.text);

			entities.push(Entity {
				text: span.text,
				span: Span { start: span.start, end: span.end },
				entity_type,
				confidence: RECOGNIZER_CONFIDENCE,
				source: EntitySource::Recognizer,
				normalized,
			});
		}

		for (entity_type, regex) in &self.patterns {
			for found in regex.find_iter(text) {
				let surface = found.as_str();

				if entities.contains_text(surface) || !self.accepts(*entity_type, surface) {
					continue;
				}

				entities.push(Entity {
					text: surface.to_string(),
					span: Span { start: found.start(), end: found.end() },
					entity_type: *entity_type,
					confidence: PATTERN_CONFIDENCE,
					source: EntitySource::Pattern,
					normalized: self.normalize(*entity_type, surface),
				});
			}
		}

		entities.rank();

		entities
	}

	fn accepts(&self, entity_type: EntityType, text: &str) -> bool {
		if matches!(entity_type, EntityType::Gene | EntityType::Protein)
			&& self.species.scientific_name(text).is_some()
		{
			return false;
		}

		is_valid(entity_type, text)
	}

	fn normalize(&self, entity_type: EntityType, text: &str) -> Option<String> {
		match entity_type {
			EntityType::Species => {
				let scientific = self.species.scientific_name(text).unwrap_or(text);

				Some(scientific.to_string())
			},
			EntityType::Gene | EntityType::Protein => Some(normalize_gene(text)),
			EntityType::Identifier => None,
		}
	}
}

/// Maps classic aliases to their official symbol and upper-cases everything else.
pub fn normalize_gene(text: &str) -> String {
	let lower = text.to_lowercase();

	GENE_ALIASES
		.iter()
		.find(|(alias, _)| *alias == lower)
		.map(|(_, symbol)| symbol.to_string())
		.unwrap_or_else(|| text.to_uppercase())
}

pub fn is_stop_word(word: &str) -> bool {
	STOP_WORDS.contains(&word)
}

fn is_valid(entity_type: EntityType, text: &str) -> bool {
	let lower = text.to_lowercase();

	if is_stop_word(&lower) {
		return false;
	}
	if entity_type != EntityType::Gene {
		return true;
	}

	let has_cased = text.chars().any(|ch| ch.is_lowercase() || ch.is_uppercase());
	let all_caps_shape =
		text.chars().all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit());

	has_cased
		&& text.chars().count() >= 2
		&& !text.chars().all(|ch| ch.is_ascii_digit())
		&& !GENE_COMMON_TERMS.contains(&lower.as_str())
		&& (all_caps_shape || GENE_ALIAS_WHITELIST.contains(&lower.as_str()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::recognizer::{RecognizedCategory, RecognizedSpan};

	struct FixedRecognizer(Vec<RecognizedSpan>);
	impl Recognizer for FixedRecognizer {
		fn recognize(&self, _text: &str) -> Vec<RecognizedSpan> {
			self.0.clone()
		}
	}

	fn extractor() -> EntityExtractor {
		EntityExtractor::pattern_only(SpeciesNormalizer::default())
			.expect("Built-in patterns must compile.")
	}

	fn texts(entities: &Entities, entity_type: EntityType) -> Vec<&str> {
		entities.of(entity_type).iter().map(|entity| entity.text.as_str()).collect()
	}

	#[test]
	fn gene_validation_accepts_symbols_and_aliases() {
		assert!(is_valid(EntityType::Gene, "TP53"));
		assert!(is_valid(EntityType::Gene, "p53"));
		assert!(is_valid(EntityType::Gene, "insulin"));
		assert!(!is_valid(EntityType::Gene, "Function"));
		assert!(!is_valid(EntityType::Gene, "DNA"));
		assert!(!is_valid(EntityType::Gene, "1234"));
		assert!(!is_valid(EntityType::Gene, "X"));
		assert!(!is_valid(EntityType::Protein, "What"));
	}

	#[test]
	fn extracts_gene_and_species() {
		let entities = extractor().extract("Find homologs of TP53 in mice");

		assert_eq!(texts(&entities, EntityType::Gene), vec!["TP53"]);
		assert_eq!(texts(&entities, EntityType::Species), vec!["mice"]);
		assert_eq!(
			entities.first(EntityType::Species).and_then(|entity| entity.normalized.as_deref()),
			Some("Mus musculus")
		);
		assert!(!entities.has(EntityType::Protein));
	}

	#[test]
	fn capitalized_species_are_not_proteins() {
		for (query, name, scientific) in [
			("Find homologs of TP53 in Mouse", "Mouse", "Mus musculus"),
			("Find homologs of TP53 in Drosophila", "Drosophila", "Drosophila melanogaster"),
			("Human TP53 and its Rat ortholog", "Human", "Homo sapiens"),
		] {
			let entities = extractor().extract(query);
			let species =
				entities.first(EntityType::Species).expect("Species must be extracted.");

			assert_eq!(species.text, name, "Wrong species for {query:?}.");
			assert_eq!(species.normalized.as_deref(), Some(scientific));
			assert!(
				!entities.has(EntityType::Protein),
				"Species leaked into proteins for {query:?}."
			);
			assert_eq!(texts(&entities, EntityType::Gene), vec!["TP53"]);
		}
	}

	#[test]
	fn gene_aliases_are_normalized() {
		let entities = extractor().extract("Get the DNA sequence of insulin gene");
		let gene = entities.first(EntityType::Gene).expect("insulin must be extracted.");

		assert_eq!(gene.text, "insulin");
		assert_eq!(gene.symbol(), "INS");
		assert_eq!(entities.len(), 1);
	}

	#[test]
	fn recognizer_wins_exact_text_collisions() {
		let recognizer = FixedRecognizer(vec![RecognizedSpan {
			text: "TP53".to_string(),
			start: 24,
			end: 28,
			category: RecognizedCategory::Protein,
		}]);
		let extractor = EntityExtractor::new(Arc::new(recognizer), SpeciesNormalizer::default())
			.expect("Built-in patterns must compile.");
		let entities = extractor.extract("What is the function of TP53 and BRCA1?");
		let protein = entities.first(EntityType::Protein).expect("Recognized protein must exist.");

		assert_eq!(protein.source, EntitySource::Recognizer);
		assert_eq!(protein.confidence, RECOGNIZER_CONFIDENCE);
		assert_eq!(texts(&entities, EntityType::Gene), vec!["BRCA1"]);
	}

	#[test]
	fn cell_type_spans_are_dropped() {
		let recognizer = FixedRecognizer(vec![RecognizedSpan {
			text: "T".to_string(),
			start: 0,
			end: 1,
			category: RecognizedCategory::CellType,
		}]);
		let extractor = EntityExtractor::new(Arc::new(recognizer), SpeciesNormalizer::default())
			.expect("Built-in patterns must compile.");

		assert!(extractor.extract("T cells").is_empty());
	}

	#[test]
	fn buckets_rank_recognizer_before_pattern() {
		let recognizer = FixedRecognizer(vec![RecognizedSpan {
			text: "BRCA2".to_string(),
			start: 10,
			end: 15,
			category: RecognizedCategory::Gene,
		}]);
		let extractor = EntityExtractor::new(Arc::new(recognizer), SpeciesNormalizer::default())
			.expect("Built-in patterns must compile.");
		let entities = extractor.extract("TP53 with BRCA2 and EGFR");

		assert_eq!(texts(&entities, EntityType::Gene), vec!["BRCA2", "TP53", "EGFR"]);
	}

	#[test]
	fn numeric_identifiers_are_extracted() {
		let entities = extractor().extract("Find cancer-related genes on chromosome 17");

		assert_eq!(texts(&entities, EntityType::Identifier), vec!["17"]);
		assert!(!entities.has(EntityType::Gene));
	}
}
