use serde::Serialize;

use bionli_domain::QueryType;

use crate::records::{Guidance, RecordStatus, ResultRecord};

const ASSISTANT_SOURCE: &str = "BioNLI Assistant";
const EXAMPLE_QUERIES: [&str; 4] = [
	"What is the function of TP53?",
	"Show me information about BRCA1",
	"Find homologs of TP53 in mice",
	"Tell me about the hemoglobin gene",
];

/// Ordered result records for one query. Never empty.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DispatchOutcome(Vec<ResultRecord>);
impl DispatchOutcome {
	pub fn records(&self) -> &[ResultRecord] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn count(&self, status: RecordStatus) -> usize {
		self.0.iter().filter(|record| record.status() == status).count()
	}

	pub fn into_records(self) -> Vec<ResultRecord> {
		self.0
	}
}

/// Wraps handler output, appending the single guidance record when nothing else was produced.
pub fn collect(mut records: Vec<ResultRecord>, query_type: QueryType) -> DispatchOutcome {
	if records.is_empty() {
		tracing::info!(
			query_type = query_type.as_str(),
			"No handler produced records. Adding guidance."
		);

		let guidance = Guidance {
			examples: EXAMPLE_QUERIES.map(String::from).to_vec(),
			..Guidance::new("No specific gene data found. Try these examples:")
		};

		records.push(ResultRecord::guidance(ASSISTANT_SOURCE, guidance).tagged(query_type));
	}

	DispatchOutcome(records)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_input_gets_exactly_one_guidance() {
		let outcome = collect(Vec::new(), QueryType::General);

		assert_eq!(outcome.len(), 1);
		assert_eq!(outcome.count(RecordStatus::Guidance), 1);
		assert_eq!(outcome.records()[0].source, ASSISTANT_SOURCE);
	}

	#[test]
	fn non_empty_input_is_untouched() {
		let records = vec![ResultRecord::not_found("NCBI Gene", "ZZZFAKE1")];
		let outcome = collect(records.clone(), QueryType::Function);

		assert_eq!(outcome.into_records(), records);
	}
}
