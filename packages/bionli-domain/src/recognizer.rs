use regex::Regex;

use bionli_config::LexiconEntry;

use crate::{Result, entity::EntityType, error};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecognizedCategory {
	Gene,
	Protein,
	Organism,
	CellType,
}
impl RecognizedCategory {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"gene" => Some(Self::Gene),
			"protein" => Some(Self::Protein),
			"organism" => Some(Self::Organism),
			"cell_type" => Some(Self::CellType),
			_ => None,
		}
	}

	/// Entity bucket for this category. Cell types have no bucket and are discarded.
	pub fn entity_type(self) -> Option<EntityType> {
		match self {
			Self::Gene => Some(EntityType::Gene),
			Self::Protein => Some(EntityType::Protein),
			Self::Organism => Some(EntityType::Species),
			Self::CellType => None,
		}
	}
}

/// A labeled span. `start` and `end` are byte offsets into the recognized text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecognizedSpan {
	pub text: String,
	pub start: usize,
	pub end: usize,
	pub category: RecognizedCategory,
}

/// Named-entity capability consulted before the pattern pass.
pub trait Recognizer
where
	Self: Send + Sync,
{
	fn recognize(&self, text: &str) -> Vec<RecognizedSpan>;
}

/// Recognizes nothing, leaving extraction to the pattern pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopRecognizer;
impl Recognizer for NoopRecognizer {
	fn recognize(&self, _text: &str) -> Vec<RecognizedSpan> {
		Vec::new()
	}
}

/// Matches configured terms as whole words, case-insensitively.
#[derive(Clone, Debug)]
pub struct LexiconRecognizer {
	terms: Vec<(Regex, RecognizedCategory)>,
}
impl LexiconRecognizer {
	pub fn new(entries: &[LexiconEntry]) -> Result<Self> {
		let mut terms = Vec::with_capacity(entries.len());

		for entry in entries {
			let Some(category) = RecognizedCategory::parse(&entry.category) else {
				continue;
			};
			let term = entry.term.trim();

			if term.is_empty() {
				continue;
			}

			let pattern = format!(r"(?i)\b{}\b", regex::escape(term));

			terms.push((error::compile("lexicon", &pattern)?, category));
		}

		Ok(Self { terms })
	}

	pub fn is_empty(&self) -> bool {
		self.terms.is_empty()
	}
}
impl Recognizer for LexiconRecognizer {
	fn recognize(&self, text: &str) -> Vec<RecognizedSpan> {
		let mut spans = Vec::new();

		for (regex, category) in &self.terms {
			for found in regex.find_iter(text) {
				spans.push(RecognizedSpan {
					text: found.as_str().to_string(),
					start: found.start(),
					end: found.end(),
					category: *category,
				});
			}
		}

		spans.sort_by_key(|span| span.start);

		spans
	}
}
