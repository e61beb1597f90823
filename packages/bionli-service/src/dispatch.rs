//! Priority-ordered resolution of a parsed query against the configured knowledge sources.
//!
//! Order: sequence, homology, concept panels, per-entity lookups, then one guidance record.
//! Source failures become `error` records and never stop the chain.

use std::{sync::Arc, time::Duration};

use tokio::time;

use bionli_config::Config;
use bionli_domain::{
	Concept, Entity, EntityType, ParseResult, QueryType, knowledge::KnowledgeTables,
	species::SpeciesNormalizer,
};

use crate::{
	GeneLookup, Sources,
	aggregate::{self, DispatchOutcome},
	records::{ConceptNote, Guidance, HomologyNote, RecordRole, ResultRecord, SequenceInfo},
};

const REFERENCE_ORGANISM: &str = "human";
const HOMOLOGY_SOURCE: &str = "Homology Database";
const SEQUENCE_SOURCE: &str = "Sequence Database";
const IMMUNE_SOURCE: &str = "Virology and Immunology Database";
const HOMOLOGY_EXAMPLE_LIMIT: usize = 3;

#[derive(Clone, Debug)]
pub struct DispatchSettings {
	pub call_timeout: Duration,
	/// Already truncated to `immune_gene_limit`.
	pub immune_genes: Vec<String>,
	/// Already truncated to `cancer_gene_limit`.
	pub cancer_genes: Vec<String>,
}
impl DispatchSettings {
	pub fn from_config(cfg: &Config) -> Self {
		let panel = |genes: &[String], limit: usize| -> Vec<String> {
			genes.iter().take(limit).cloned().collect()
		};

		Self {
			call_timeout: Duration::from_millis(cfg.dispatch.call_timeout_ms),
			immune_genes: panel(&cfg.knowledge.immune_genes, cfg.dispatch.immune_gene_limit),
			cancer_genes: panel(&cfg.knowledge.cancer_genes, cfg.dispatch.cancer_gene_limit),
		}
	}
}

pub struct ResolutionDispatcher {
	sources: Sources,
	tables: Arc<KnowledgeTables>,
	species: SpeciesNormalizer,
	settings: DispatchSettings,
}
impl ResolutionDispatcher {
	pub fn new(
		sources: Sources,
		tables: Arc<KnowledgeTables>,
		species: SpeciesNormalizer,
		settings: DispatchSettings,
	) -> Self {
		Self { sources, tables, species, settings }
	}

	pub async fn dispatch(&self, parsed: &ParseResult) -> DispatchOutcome {
		let query_type = parsed.query_type;
		let genes = parsed.entities.genes();

		if query_type == QueryType::Sequence
			&& let Some(gene) = genes.first()
		{
			tracing::debug!(gene = gene.symbol(), "Dispatching to the sequence handler.");

			return aggregate::collect(self.sequence(gene).await, query_type);
		}

		// Homology priority and the concept panels share one pass. The homology handler
		// never comes back empty, so reaching the entity step means no concept handler matched.
		let mut records = self.concept_handlers(parsed).await;

		if records.is_empty() && !genes.is_empty() {
			tracing::debug!(genes = genes.len(), "Dispatching entity lookups.");

			for gene in genes {
				records.extend(self.entity_lookup(gene, query_type).await);
			}
		}

		aggregate::collect(records, query_type)
	}

	async fn concept_handlers(&self, parsed: &ParseResult) -> Vec<ResultRecord> {
		let query_type = parsed.query_type;
		let concepts = &parsed.concepts;

		if query_type == QueryType::Homology
			&& let (Some(gene), Some(species)) = (
				parsed.entities.genes().first(),
				parsed.entities.first(EntityType::Species),
			) {
			let target = self.species.normalize(species.symbol());

			tracing::debug!(gene = gene.symbol(), target, "Dispatching to the homology handler.");

			return self.homology(gene.symbol(), target).await;
		}
		if query_type == QueryType::ImmuneVirusInteraction
			|| (concepts.has(Concept::Immune) && concepts.has(Concept::Virus))
		{
			tracing::debug!("Dispatching to the immune-virus panel.");

			return self.immune_virus().await;
		}
		if query_type == QueryType::CancerGene || concepts.has(Concept::Cancer) {
			tracing::debug!("Dispatching to the cancer panel.");

			return self.cancer().await;
		}

		Vec::new()
	}

	async fn sequence(&self, gene: &Entity) -> Vec<ResultRecord> {
		let symbol = gene.symbol();
		let mut records: Vec<_> = self
			.lookup(self.sources.primary.as_ref(), symbol, REFERENCE_ORGANISM)
			.await
			.into_iter()
			.map(|record| {
				if !record.is_success() {
					return record;
				}

				record
					.with_sequence_info(SequenceInfo::for_gene(symbol))
					.tagged(QueryType::Sequence)
			})
			.collect();

		if !records.iter().any(ResultRecord::is_success) {
			records.push(
				ResultRecord::guidance(SEQUENCE_SOURCE, sequence_guidance(symbol))
					.tagged(RecordRole::SequenceGuidance),
			);
		}

		records
	}

	async fn homology(&self, symbol: &str, target: &str) -> Vec<ResultRecord> {
		let primary = self.sources.primary.as_ref();
		let Some(homolog) = self.tables.homologs.lookup(symbol, target) else {
			return vec![self.homology_guidance(symbol, target)];
		};
		let reference = self.lookup(primary, symbol, REFERENCE_ORGANISM).await;
		let result = self.lookup(primary, homolog, target).await;
		let mut records = Vec::new();
		let mut failures = Vec::new();

		for record in reference {
			if !record.is_success() {
				failures.push(record);

				continue;
			}

			records.push(
				record
					.with_homology(HomologyNote {
						note: "Original human gene".to_string(),
						original_gene: None,
						relationship: None,
					})
					.tagged(RecordRole::HomologyReference),
			);
		}
		for record in result {
			if !record.is_success() {
				failures.push(record);

				continue;
			}

			records.push(
				record
					.with_homology(HomologyNote {
						note: format!("{target} homolog of {symbol}"),
						original_gene: Some(symbol.to_string()),
						relationship: Some("ortholog".to_string()),
					})
					.tagged(RecordRole::HomologyResult),
			);
		}

		if records.is_empty() {
			tracing::info!(symbol, homolog, target, "Homolog lookups found nothing.");

			failures.push(self.homology_guidance(symbol, target));

			return failures;
		}

		records
	}

	async fn immune_virus(&self) -> Vec<ResultRecord> {
		let note = ConceptNote {
			concept: "immune_response_antiviral".to_string(),
			notes: vec![
				"Targeted by various viruses to evade immune detection".to_string(),
				"Viruses often target these genes to suppress interferon response".to_string(),
			],
		};
		let mut records = self.panel(&self.settings.immune_genes, &note).await;

		if !records.iter().any(ResultRecord::is_success) {
			records.push(ResultRecord::guidance(IMMUNE_SOURCE, immune_guidance()));
		}

		records
	}

	async fn cancer(&self) -> Vec<ResultRecord> {
		let note = ConceptNote {
			concept: "cancer_related".to_string(),
			notes: vec!["Oncogene or tumor suppressor".to_string()],
		};

		self.panel(&self.settings.cancer_genes, &note).await
	}

	async fn panel(&self, genes: &[String], note: &ConceptNote) -> Vec<ResultRecord> {
		let mut records = Vec::new();

		for gene in genes {
			let found = self.lookup(self.sources.primary.as_ref(), gene, REFERENCE_ORGANISM).await;

			records.extend(found.into_iter().map(|record| {
				if record.is_success() { record.with_concept(note.clone()) } else { record }
			}));
		}

		records
	}

	async fn entity_lookup(&self, gene: &Entity, query_type: QueryType) -> Vec<ResultRecord> {
		let mut records = Vec::new();

		for source in self.sources.all() {
			let found = self.lookup(source.as_ref(), gene.symbol(), REFERENCE_ORGANISM).await;

			records.extend(
				found.into_iter().map(|record| record.tagged(query_type).for_query(&gene.text)),
			);
		}

		records
	}

	/// One bounded call to `source`. Never fails: errors and timeouts become `error` records.
	async fn lookup(
		&self,
		source: &dyn GeneLookup,
		symbol: &str,
		organism: &str,
	) -> Vec<ResultRecord> {
		let name = source.source();

		match time::timeout(self.settings.call_timeout, source.find(symbol, organism)).await {
			Ok(Ok(genes)) if genes.is_empty() => vec![ResultRecord::not_found(name, symbol)],
			Ok(Ok(genes)) =>
				genes.into_iter().map(|gene| ResultRecord::gene(name, gene)).collect(),
			Ok(Err(err)) => {
				tracing::warn!(source = name, symbol, organism, error = %err, "Gene lookup failed.");

				vec![ResultRecord::error(name, symbol, format!("{name} is temporarily unavailable."))]
			},
			Err(_) => {
				tracing::warn!(
					source = name,
					symbol,
					organism,
					timeout_ms = self.settings.call_timeout.as_millis() as u64,
					"Gene lookup timed out."
				);

				vec![ResultRecord::error(name, symbol, format!("{name} did not answer in time."))]
			},
		}
	}

	fn homology_guidance(&self, symbol: &str, target: &str) -> ResultRecord {
		let mut examples = self.tables.homologs.examples(target, HOMOLOGY_EXAMPLE_LIMIT);

		examples.push("Use gene symbols in uppercase for best results".to_string());

		let guidance = Guidance {
			gene: Some(symbol.to_string()),
			target_species: Some(target.to_string()),
			examples,
			recommended_tools: ["Ensembl Compare", "NCBI Homologene", "OrthoDB"]
				.map(String::from)
				.to_vec(),
			links: vec![
				format!("https://www.ncbi.nlm.nih.gov/homologene?term={symbol}"),
				format!("https://useast.ensembl.org/Homo_sapiens/Gene/Compara_Homolog?g={symbol}"),
			],
			..Guidance::new("Use specialized databases for detailed homology analysis.")
		};

		ResultRecord::guidance(HOMOLOGY_SOURCE, guidance).tagged(RecordRole::HomologyGuidance)
	}
}

fn sequence_guidance(symbol: &str) -> Guidance {
	Guidance {
		gene: Some(symbol.to_string()),
		recommended_tools: ["NCBI Nucleotide", "Ensembl", "UCSC Genome Browser"]
			.map(String::from)
			.to_vec(),
		links: vec![
			format!("https://www.ncbi.nlm.nih.gov/nucleotide/?term={symbol}"),
			format!("https://useast.ensembl.org/Homo_sapiens/Gene/Summary?g={symbol}"),
		],
		examples: vec![
			"For insulin: https://www.ncbi.nlm.nih.gov/nucleotide/NM_000207".to_string(),
			"For TP53: https://www.ncbi.nlm.nih.gov/nucleotide/NM_000546".to_string(),
			"For BRCA1: https://www.ncbi.nlm.nih.gov/nucleotide/NM_007294".to_string(),
		],
		..Guidance::new(format!("Sequence data for {symbol}."))
	}
}

fn immune_guidance() -> Guidance {
	Guidance {
		key_genes: ["TLR3", "TLR7", "RIGI", "MDA5", "STAT1", "IRF3"].map(String::from).to_vec(),
		strategies: [
			"Suppression of interferon signaling",
			"Degradation of antiviral proteins",
			"Inhibition of pattern recognition receptors",
			"Modulation of cytokine responses",
		]
		.map(String::from)
		.to_vec(),
		examples: [
			"HIV targets STAT1 to evade interferon response",
			"Influenza inhibits RIG-I signaling",
			"Herpes viruses target TLR pathways",
		]
		.map(String::from)
		.to_vec(),
		..Guidance::new("Viruses target key immune genes to evade detection.")
	}
}
