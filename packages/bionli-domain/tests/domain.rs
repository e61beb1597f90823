use std::{collections::HashSet, sync::Arc};

use bionli_config::{Knowledge, LexiconEntry};
use bionli_domain::{
	Concept, EntitySource, EntityType, ParsePipeline, QueryType, knowledge::KnowledgeTables,
	recognizer::LexiconRecognizer, species::SpeciesNormalizer,
};

const CORPUS: &[&str] = &[
	"What is the function of TP53 gene?",
	"Tell me about the role of BRCA1 in DNA repair",
	"Get the DNA sequence of insulin gene",
	"Show me the protein sequence of EGFR",
	"Find homologs of TP53 in mice",
	"What is the mouse version of BRCA1 gene?",
	"Where is the insulin gene expressed?",
	"What proteins interact with TP53?",
	"Which immune genes are targeted by viruses?",
	"Find cancer-related genes on chromosome 17",
	"TP53 TP53 TP53 and p53 in human and mouse",
	"asdkjasd randomtext",
	"",
	"P04637 is the UniProt accession for Tp53 protein",
];

fn pipeline() -> ParsePipeline {
	ParsePipeline::pattern_only().expect("Built-in pipeline must compile.")
}

#[test]
fn parsing_is_deterministic() {
	let pipeline = pipeline();

	for query in CORPUS {
		assert_eq!(pipeline.parse(query), pipeline.parse(query), "Parse diverged for {query:?}.");
	}
}

#[test]
fn no_duplicate_text_within_a_bucket() {
	let pipeline = pipeline();

	for query in CORPUS {
		let parsed = pipeline.parse(query);

		for (entity_type, entities) in parsed.entities.iter() {
			let mut seen = HashSet::new();

			for entity in entities {
				assert!(
					seen.insert(entity.text.as_str()),
					"Duplicate {} {:?} for {query:?}.",
					entity_type.as_str(),
					entity.text
				);
			}
		}
	}
}

#[test]
fn confidence_stays_in_bounds() {
	let pipeline = pipeline();

	for query in CORPUS {
		let confidence = pipeline.parse(query).confidence;

		assert!((0.5..=1.0).contains(&confidence), "Confidence {confidence} for {query:?}.");
	}
}

#[test]
fn sequence_keyword_beats_homology_keyword() {
	let parsed = pipeline().parse("Show the sequence of the mouse ortholog of TP53");

	assert!(parsed.concepts.has(Concept::Homology));
	assert_eq!(parsed.query_type, QueryType::Sequence);
}

#[test]
fn function_question_scenario() {
	let parsed = pipeline().parse("What is the function of TP53 gene?");
	let genes: Vec<_> = parsed.entities.genes().iter().map(|entity| entity.text.as_str()).collect();

	assert_eq!(genes, vec!["TP53"]);
	assert_eq!(parsed.entities.len(), 1);
	assert_eq!(parsed.query_type, QueryType::Function);
	assert!(parsed.confidence >= 0.8);
}

#[test]
fn homology_question_scenario() {
	let parsed = pipeline().parse("Find homologs of TP53 in mice");

	assert_eq!(parsed.query_type, QueryType::Homology);
	assert!(parsed.entities.has(EntityType::Species));
}

#[test]
fn capitalized_species_keeps_homology_routing() {
	let parsed = pipeline().parse("Find homologs of TP53 in Drosophila");
	let species =
		parsed.entities.first(EntityType::Species).expect("Drosophila must be a species.");

	assert_eq!(parsed.query_type, QueryType::Homology);
	assert_eq!(species.symbol(), "Drosophila melanogaster");
	assert!(!parsed.entities.has(EntityType::Protein));
}

#[test]
fn consequence_is_not_a_sequence_question() {
	let parsed = pipeline().parse("What is the consequence of KRAS loss");

	assert_ne!(parsed.query_type, QueryType::Sequence);
	assert!(!parsed.concepts.has(Concept::Sequence));
}

#[test]
fn sequence_question_scenario() {
	let parsed = pipeline().parse("Get the DNA sequence of insulin gene");
	let gene = parsed.entities.genes().first().expect("insulin must be recognized as a gene.");

	assert_eq!(parsed.query_type, QueryType::Sequence);
	assert_eq!(gene.symbol(), "INS");
	assert_eq!(parsed.normalized_query, "Get the DNA sequence of INS gene");
}

#[test]
fn gibberish_scenario() {
	let parsed = pipeline().parse("asdkjasd randomtext");

	assert!(parsed.entities.is_empty());
	assert!(parsed.concepts.is_empty());
	assert_eq!(parsed.query_type, QueryType::General);
	assert_eq!(parsed.confidence, 0.5);
}

#[test]
fn lexicon_recognizer_feeds_the_pipeline() {
	let recognizer = LexiconRecognizer::new(&[LexiconEntry {
		term: "Tp53".to_string(),
		category: "protein".to_string(),
	}])
	.expect("Lexicon must compile.");
	let pipeline = ParsePipeline::new(Arc::new(recognizer), SpeciesNormalizer::default())
		.expect("Pipeline must compile.");
	let parsed = pipeline.parse("Where is Tp53 expressed?");
	let protein =
		parsed.entities.first(EntityType::Protein).expect("Lexicon term must be recognized.");

	assert_eq!(protein.source, EntitySource::Recognizer);
	assert_eq!(protein.symbol(), "TP53");
	assert_eq!(parsed.query_type, QueryType::Expression);
}

#[test]
fn entity_json_uses_type_buckets() {
	let parsed = pipeline().parse("Find homologs of TP53 in mice");
	let json = serde_json::to_value(&parsed.entities).expect("Entities must serialize.");

	assert_eq!(json["gene"][0]["text"], "TP53");
	assert_eq!(json["gene"][0]["source"], "pattern");
	assert_eq!(json["species"][0]["normalized"], "Mus musculus");
	assert!(json.get("protein").is_none());
}

#[test]
fn unknown_symbol_pathway_lookup_never_empty() {
	let tables = KnowledgeTables::from_config(&Knowledge::default());
	let pathways = tables.pathways.lookup("ZZZFAKE1");
	let names: Vec<_> = pathways.iter().map(|pathway| pathway.name.as_str()).collect();

	assert_eq!(names, vec!["Common cellular pathways", "Metabolic pathways", "Signal transduction"]);
}
