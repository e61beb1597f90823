use crate::{
	classify::QueryType,
	concept::ConceptSet,
	entity::{Entities, EntityType},
};

pub const BASE_CONFIDENCE: f32 = 0.5;

pub fn score(entities: &Entities, query_type: QueryType, concepts: &ConceptSet) -> f32 {
	let mut confidence = BASE_CONFIDENCE;

	if entities.has(EntityType::Gene) || entities.has(EntityType::Protein) {
		confidence += 0.3;
	}
	if query_type != QueryType::General {
		confidence += 0.2;
	}
	if !concepts.is_empty() {
		confidence += 0.1;
	}

	confidence.min(1.0)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::concept::Concept;

	#[test]
	fn empty_parse_scores_base() {
		let score = score(&Entities::default(), QueryType::General, &ConceptSet::default());

		assert_eq!(score, BASE_CONFIDENCE);
	}

	#[test]
	fn query_type_and_concepts_add_boosts() {
		let concepts: ConceptSet =
			[(Concept::Function, vec!["function".to_string()])].into_iter().collect();
		let score = score(&Entities::default(), QueryType::Function, &concepts);

		assert!((score - 0.8).abs() < 1e-6);
	}
}
