use regex::Regex;
use serde::Serialize;

use crate::{
	Result,
	concept::{Concept, ConceptSet},
	entity::{Entities, EntityType},
	error,
};

const PATTERN_WEIGHT: u32 = 3;
const KEYWORD_WEIGHT: u32 = 1;
const HOMOLOGY_WORDS: [&str; 3] = ["homolog", "ortholog", "equivalent"];
// Whole word only: "consequence" and "sequenced" do not count.
const SEQUENCE_WORD: &str = r"\bsequences?\b";

struct RuleSpec {
	query_type: QueryType,
	patterns: &'static [&'static str],
	keywords: &'static [&'static str],
}

// Declaration order breaks score ties.
const RULES: [RuleSpec; 5] = [
	RuleSpec {
		query_type: QueryType::Function,
		patterns: &["function of", "role of", "what does", "biological function", "purpose of"],
		keywords: &["function", "role", "purpose"],
	},
	RuleSpec {
		query_type: QueryType::Expression,
		patterns: &["expression in", "expressed in", "tissue expression", "where is.*expressed"],
		keywords: &["expression", "expressed", "tissue", "cell type"],
	},
	RuleSpec {
		query_type: QueryType::Interaction,
		patterns: &["interacts with", "interaction.*between", "protein.*interaction", "binds to"],
		keywords: &["interact", "interaction", "bind", "complex", "partner"],
	},
	RuleSpec {
		query_type: QueryType::Sequence,
		patterns: &[
			"sequence of",
			"get sequence",
			"dna sequence",
			"protein sequence",
			"nucleotide sequence",
		],
		keywords: &["sequence", "dna", "rna", "amino acid", "nucleotide"],
	},
	RuleSpec {
		query_type: QueryType::Homology,
		patterns: &["homolog of", "ortholog of", "equivalent.*in", "counterpart in", "mouse version of"],
		keywords: &["homolog", "ortholog", "equivalent", "counterpart", "version"],
	},
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
	Sequence,
	Homology,
	ImmuneVirusInteraction,
	CancerGene,
	Function,
	Expression,
	Interaction,
	General,
}
impl QueryType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Sequence => "sequence",
			Self::Homology => "homology",
			Self::ImmuneVirusInteraction => "immune_virus_interaction",
			Self::CancerGene => "cancer_gene",
			Self::Function => "function",
			Self::Expression => "expression",
			Self::Interaction => "interaction",
			Self::General => "general",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		[
			Self::Sequence,
			Self::Homology,
			Self::ImmuneVirusInteraction,
			Self::CancerGene,
			Self::Function,
			Self::Expression,
			Self::Interaction,
			Self::General,
		]
		.into_iter()
		.find(|query_type| query_type.as_str() == raw)
	}
}

struct Rule {
	query_type: QueryType,
	patterns: Vec<Regex>,
	/// Anchored at a word start, so "interact" still counts in "interaction".
	keywords: Vec<Regex>,
}

/// Priority gates first, then a weighted pattern/keyword score.
pub struct QueryClassifier {
	rules: Vec<Rule>,
	sequence_word: Regex,
}
impl QueryClassifier {
	pub fn new() -> Result<Self> {
		let mut rules = Vec::with_capacity(RULES.len());

		for spec in RULES {
			let mut patterns = Vec::with_capacity(spec.patterns.len());

			for pattern in spec.patterns {
				patterns.push(error::compile("classifier", pattern)?);
			}

			let mut keywords = Vec::with_capacity(spec.keywords.len());

			for keyword in spec.keywords {
				let pattern = format!(r"\b{}", regex::escape(keyword));

				keywords.push(error::compile("classifier", &pattern)?);
			}

			rules.push(Rule { query_type: spec.query_type, patterns, keywords });
		}

		let sequence_word = error::compile("classifier", SEQUENCE_WORD)?;

		Ok(Self { rules, sequence_word })
	}

	pub fn classify(&self, text: &str, concepts: &ConceptSet, entities: &Entities) -> QueryType {
		let lower = text.to_lowercase();
		let has_gene = entities.has(EntityType::Gene);

		if concepts.has(Concept::Sequence) || self.sequence_word.is_match(&lower) {
			return QueryType::Sequence;
		}
		if concepts.has(Concept::Homology) {
			return QueryType::Homology;
		}
		if concepts.has(Concept::Immune) && concepts.has(Concept::Virus) {
			return QueryType::ImmuneVirusInteraction;
		}
		if concepts.has(Concept::Cancer) && has_gene {
			return QueryType::CancerGene;
		}
		if has_gene
			&& entities.has(EntityType::Species)
			&& HOMOLOGY_WORDS.iter().any(|word| lower.contains(word))
		{
			return QueryType::Homology;
		}

		let mut best = QueryType::General;
		let mut best_score = 0;

		for rule in &self.rules {
			let score = rule.score(&lower);

			if score > best_score {
				best = rule.query_type;
				best_score = score;
			}
		}

		best
	}

	/// Per-type scores for the weighted stage, in declaration order.
	pub fn scores(&self, text: &str) -> Vec<(QueryType, u32)> {
		let lower = text.to_lowercase();

		self.rules.iter().map(|rule| (rule.query_type, rule.score(&lower))).collect()
	}
}

impl Rule {
	fn score(&self, lower: &str) -> u32 {
		let patterns = self.patterns.iter().filter(|regex| regex.is_match(lower)).count() as u32;
		let keywords = self.keywords.iter().filter(|regex| regex.is_match(lower)).count() as u32;

		patterns * PATTERN_WEIGHT + keywords * KEYWORD_WEIGHT
	}
}
