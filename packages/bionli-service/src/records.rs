//! The uniform result record every resolution handler produces.

use serde::Serialize;

use bionli_domain::QueryType;
use bionli_providers::GeneRecord;

const RETRY_SUGGESTION: &str = "Try again in a moment.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
	Success,
	NotFound,
	Error,
	Guidance,
}

/// Handler-specific roles that refine a record's query type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordRole {
	HomologyReference,
	HomologyResult,
	HomologyGuidance,
	SequenceGuidance,
}

/// Either the parsed query type or a handler role, serialized as a bare string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RecordTag {
	Query(QueryType),
	Role(RecordRole),
}
impl From<QueryType> for RecordTag {
	fn from(query_type: QueryType) -> Self {
		Self::Query(query_type)
	}
}

impl From<RecordRole> for RecordTag {
	fn from(role: RecordRole) -> Self {
		Self::Role(role)
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordDetail {
	Gene(GeneRecord),
	NotFound { symbol: String, message: String },
	Error { symbol: String, message: String, suggestion: String },
	Guidance(Guidance),
}

/// Pointers to better tools when no specific data answered the query.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Guidance {
	pub message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub gene: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub target_species: Option<String>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub examples: Vec<String>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub recommended_tools: Vec<String>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub links: Vec<String>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub key_genes: Vec<String>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub strategies: Vec<String>,
}
impl Guidance {
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into(), ..Default::default() }
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HomologyNote {
	pub note: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub original_gene: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub relationship: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConceptNote {
	pub concept: String,
	pub notes: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SequenceInfo {
	pub available: String,
	pub direct_link: String,
	pub types: Vec<String>,
	pub recommended_action: String,
}
impl SequenceInfo {
	pub fn for_gene(symbol: &str) -> Self {
		Self {
			available: "Full sequences available via NCBI Nucleotide database".to_string(),
			direct_link: format!("https://www.ncbi.nlm.nih.gov/nucleotide/?term={symbol}[gene]"),
			types: ["Genomic DNA", "mRNA", "Protein sequence"].map(String::from).to_vec(),
			recommended_action: "Use NCBI Nucleotide database for complete sequences".to_string(),
		}
	}
}

/// One entry of a dispatch outcome.
///
/// `status` always agrees with `detail`; both are fixed by the constructor.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultRecord {
	status: RecordStatus,
	pub source: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub query_type: Option<RecordTag>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub original_query: Option<String>,
	#[serde(flatten)]
	detail: RecordDetail,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub homology: Option<HomologyNote>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub concept: Option<ConceptNote>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub sequence_info: Option<SequenceInfo>,
}
impl ResultRecord {
	pub fn gene(source: &str, record: GeneRecord) -> Self {
		Self::with_detail(RecordStatus::Success, source, RecordDetail::Gene(record))
	}

	pub fn not_found(source: &str, symbol: &str) -> Self {
		Self::with_detail(
			RecordStatus::NotFound,
			source,
			RecordDetail::NotFound {
				symbol: symbol.to_string(),
				message: format!("Gene {symbol} not found in {source}."),
			},
		)
	}

	pub fn error(source: &str, symbol: &str, message: impl Into<String>) -> Self {
		Self::with_detail(
			RecordStatus::Error,
			source,
			RecordDetail::Error {
				symbol: symbol.to_string(),
				message: message.into(),
				suggestion: RETRY_SUGGESTION.to_string(),
			},
		)
	}

	pub fn guidance(source: &str, guidance: Guidance) -> Self {
		Self::with_detail(RecordStatus::Guidance, source, RecordDetail::Guidance(guidance))
	}

	fn with_detail(status: RecordStatus, source: &str, detail: RecordDetail) -> Self {
		Self {
			status,
			source: source.to_string(),
			query_type: None,
			original_query: None,
			detail,
			homology: None,
			concept: None,
			sequence_info: None,
		}
	}

	pub fn status(&self) -> RecordStatus {
		self.status
	}

	pub fn detail(&self) -> &RecordDetail {
		&self.detail
	}

	pub fn is_success(&self) -> bool {
		self.status == RecordStatus::Success
	}

	pub fn gene_record(&self) -> Option<&GeneRecord> {
		match &self.detail {
			RecordDetail::Gene(record) => Some(record),
			_ => None,
		}
	}

	pub fn tagged(mut self, tag: impl Into<RecordTag>) -> Self {
		self.query_type = Some(tag.into());

		self
	}

	pub fn for_query(mut self, original_query: &str) -> Self {
		self.original_query = Some(original_query.to_string());

		self
	}

	pub fn with_homology(mut self, note: HomologyNote) -> Self {
		self.homology = Some(note);

		self
	}

	pub fn with_concept(mut self, note: ConceptNote) -> Self {
		self.concept = Some(note);

		self
	}

	pub fn with_sequence_info(mut self, info: SequenceInfo) -> Self {
		self.sequence_info = Some(info);

		self
	}
}
