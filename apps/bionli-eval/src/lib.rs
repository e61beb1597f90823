//! Benchmark runner: scores entity recognition, query classification, and resolution over a
//! dataset of annotated questions.

use std::{
	collections::BTreeMap,
	fs,
	path::{Path, PathBuf},
};

use clap::Parser;
use color_eyre::eyre;
use serde::{Deserialize, Serialize};

use bionli_domain::{ParseResult, QueryType};
use bionli_service::{BioNliService, DispatchOutcome, RecordStatus};

const BUILTIN_DATASET: &str = include_str!("../datasets/benchmark.json");
const ENTITY_WEIGHT: f64 = 0.3;
const QUERY_TYPE_WEIGHT: f64 = 0.3;
const RESPONSE_WEIGHT: f64 = 0.4;

#[derive(Debug, Parser)]
#[command(
	version = bionli_cli::VERSION,
	rename_all = "kebab",
	styles = bionli_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Defaults to the built-in benchmark.
	#[arg(long, short = 'd', value_name = "FILE")]
	pub dataset: Option<PathBuf>,
	/// Score parsing only; no knowledge source is contacted.
	#[arg(long)]
	pub parse_only: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Dataset {
	pub name: String,
	pub questions: Vec<BenchmarkQuestion>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BenchmarkQuestion {
	pub id: String,
	pub question: String,
	pub category: String,
	pub expected_entities: Vec<String>,
	pub expected_query_type: String,
	pub difficulty: String,
}

#[derive(Debug, Serialize)]
pub struct EvalReport {
	pub dataset: String,
	pub question_count: usize,
	pub metrics: Metrics,
	/// Weighted 0.3 entities, 0.3 query types, 0.4 responses. Absent in parse-only runs.
	pub overall_score: Option<f64>,
	pub categories: BTreeMap<String, CategoryCounts>,
	pub questions: Vec<QuestionReport>,
}

#[derive(Debug, Serialize)]
pub struct Metrics {
	pub entity_recognition_accuracy: f64,
	pub query_classification_accuracy: f64,
	pub response_success_rate: Option<f64>,
	pub average_confidence: f64,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
	pub total: usize,
	pub correct_entities: usize,
	pub correct_query_types: usize,
	pub valid_responses: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct QuestionReport {
	pub id: String,
	pub question: String,
	pub category: String,
	pub difficulty: String,
	pub extracted_entities: Vec<String>,
	pub expected_entities: Vec<String>,
	pub detected_query_type: QueryType,
	pub expected_query_type: String,
	pub confidence: f32,
	pub entity_recognition_correct: bool,
	pub query_type_correct: bool,
	pub has_valid_response: Option<bool>,
	pub response_count: Option<usize>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = bionli_config::load(&args.config)?;

	bionli_cli::init_tracing(&config.service.log_level);

	let dataset = match &args.dataset {
		Some(path) => load_dataset(path)?,
		None => builtin_dataset()?,
	};
	let service = BioNliService::new(config)?;
	let report = evaluate(&service, &dataset, args.parse_only).await;
	let json = serde_json::to_string_pretty(&report)?;

	println!("{json}");

	Ok(())
}

pub fn builtin_dataset() -> color_eyre::Result<Dataset> {
	parse_dataset(BUILTIN_DATASET)
}

pub fn load_dataset(path: &Path) -> color_eyre::Result<Dataset> {
	let raw = fs::read_to_string(path)?;

	parse_dataset(&raw)
}

fn parse_dataset(raw: &str) -> color_eyre::Result<Dataset> {
	let dataset: Dataset = serde_json::from_str(raw)?;

	if dataset.questions.is_empty() {
		return Err(eyre::eyre!("Dataset {} must contain at least one question.", dataset.name));
	}

	for question in &dataset.questions {
		if QueryType::parse(&question.expected_query_type).is_none() {
			return Err(eyre::eyre!(
				"Question {} has unknown expected_query_type {:?}.",
				question.id,
				question.expected_query_type
			));
		}
	}

	Ok(dataset)
}

/// Runs every question through the parse pipeline and, unless `parse_only`, the dispatcher.
pub async fn evaluate(
	service: &BioNliService,
	dataset: &Dataset,
	parse_only: bool,
) -> EvalReport {
	let mut questions = Vec::with_capacity(dataset.questions.len());

	for question in &dataset.questions {
		let parsed = service.pipeline.parse(&question.question);
		let outcome =
			if parse_only { None } else { Some(service.dispatcher.dispatch(&parsed).await) };
		let report = score_question(question, &parsed, outcome.as_ref());

		tracing::debug!(
			id = %report.id,
			query_type_correct = report.query_type_correct,
			entity_recognition_correct = report.entity_recognition_correct,
			"Question scored."
		);

		questions.push(report);
	}

	summarize(&dataset.name, questions)
}

/// Entities match when every expected symbol appears among the gene entities, by surface text
/// or normalized symbol. A response is valid when it has records and none is `not_found`.
pub fn score_question(
	question: &BenchmarkQuestion,
	parsed: &ParseResult,
	outcome: Option<&DispatchOutcome>,
) -> QuestionReport {
	let genes = parsed.entities.genes();
	let entity_recognition_correct = question.expected_entities.iter().all(|expected| {
		genes.iter().any(|gene| gene.text == *expected || gene.symbol() == expected.as_str())
	});
	let has_valid_response = outcome
		.map(|outcome| !outcome.is_empty() && outcome.count(RecordStatus::NotFound) == 0);

	QuestionReport {
		id: question.id.clone(),
		question: question.question.clone(),
		category: question.category.clone(),
		difficulty: question.difficulty.clone(),
		extracted_entities: genes.iter().map(|gene| gene.text.clone()).collect(),
		expected_entities: question.expected_entities.clone(),
		detected_query_type: parsed.query_type,
		expected_query_type: question.expected_query_type.clone(),
		confidence: parsed.confidence,
		entity_recognition_correct,
		query_type_correct: parsed.query_type.as_str() == question.expected_query_type,
		has_valid_response,
		response_count: outcome.map(DispatchOutcome::len),
	}
}

pub fn summarize(dataset: &str, questions: Vec<QuestionReport>) -> EvalReport {
	let total = questions.len();
	let count = |pred: fn(&QuestionReport) -> bool| questions.iter().filter(|q| pred(q)).count();
	let entity_recognition_accuracy = ratio(count(|q| q.entity_recognition_correct), total);
	let query_classification_accuracy = ratio(count(|q| q.query_type_correct), total);
	let dispatched = questions.iter().all(|q| q.has_valid_response.is_some());
	let response_success_rate = dispatched
		.then(|| ratio(count(|q| q.has_valid_response == Some(true)), total));
	let average_confidence = if total == 0 {
		0.0
	} else {
		questions.iter().map(|q| f64::from(q.confidence)).sum::<f64>() / total as f64
	};
	let overall_score = response_success_rate.map(|response| {
		entity_recognition_accuracy * ENTITY_WEIGHT
			+ query_classification_accuracy * QUERY_TYPE_WEIGHT
			+ response * RESPONSE_WEIGHT
	});
	let mut categories: BTreeMap<String, CategoryCounts> = BTreeMap::new();

	for question in &questions {
		let counts = categories.entry(question.category.clone()).or_default();

		counts.total += 1;
		counts.correct_entities += usize::from(question.entity_recognition_correct);
		counts.correct_query_types += usize::from(question.query_type_correct);

		if let Some(valid) = question.has_valid_response {
			*counts.valid_responses.get_or_insert(0) += usize::from(valid);
		}
	}

	EvalReport {
		dataset: dataset.to_string(),
		question_count: total,
		metrics: Metrics {
			entity_recognition_accuracy,
			query_classification_accuracy,
			response_success_rate,
			average_confidence,
		},
		overall_score,
		categories,
		questions,
	}
}

fn ratio(hits: usize, total: usize) -> f64 {
	if total == 0 { 0.0 } else { hits as f64 / total as f64 }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn report(
		category: &str,
		entities: bool,
		query_type: bool,
		response: Option<bool>,
	) -> QuestionReport {
		QuestionReport {
			id: "Q".to_string(),
			question: "q".to_string(),
			category: category.to_string(),
			difficulty: "basic".to_string(),
			extracted_entities: Vec::new(),
			expected_entities: Vec::new(),
			detected_query_type: QueryType::General,
			expected_query_type: "general".to_string(),
			confidence: 0.5,
			entity_recognition_correct: entities,
			query_type_correct: query_type,
			has_valid_response: response,
			response_count: response.map(|_| 1),
		}
	}

	#[test]
	fn overall_score_is_weighted() {
		let summary = summarize(
			"t",
			vec![report("a", true, true, Some(true)), report("a", true, false, Some(false))],
		);

		assert_eq!(summary.metrics.entity_recognition_accuracy, 1.0);
		assert_eq!(summary.metrics.query_classification_accuracy, 0.5);
		assert_eq!(summary.metrics.response_success_rate, Some(0.5));
		assert!((summary.overall_score.unwrap_or_default() - 0.65).abs() < 1e-9);
		assert_eq!(
			summary.categories["a"],
			CategoryCounts {
				total: 2,
				correct_entities: 2,
				correct_query_types: 1,
				valid_responses: Some(1),
			}
		);
	}

	#[test]
	fn parse_only_has_no_response_metrics() {
		let summary = summarize("t", vec![report("a", false, true, None)]);

		assert_eq!(summary.metrics.response_success_rate, None);
		assert_eq!(summary.overall_score, None);
		assert_eq!(summary.categories["a"].valid_responses, None);
	}

	#[test]
	fn builtin_dataset_loads() {
		let dataset = builtin_dataset().expect("Built-in dataset must parse.");

		assert_eq!(dataset.questions.len(), 10);
		assert_eq!(dataset.questions[0].id, "GF001");
	}

	#[test]
	fn rejects_unknown_query_type() {
		let raw = r#"{"name":"x","questions":[{"id":"Q1","question":"q","category":"c",
			"expected_entities":[],"expected_query_type":"weather","difficulty":"basic"}]}"#;

		assert!(parse_dataset(raw).is_err());
	}
}
