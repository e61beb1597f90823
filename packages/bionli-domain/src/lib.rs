//! Query understanding for biological questions: entity and concept extraction, query-type
//! classification, and confidence scoring, plus the static tables used to resolve them.

pub mod classify;
pub mod concept;
pub mod confidence;
pub mod entity;
pub mod knowledge;
pub mod parse;
pub mod recognizer;
pub mod species;

mod error;

pub use classify::QueryType;
pub use concept::{Concept, ConceptSet};
pub use entity::{Entities, Entity, EntitySource, EntityType};
pub use error::{Error, Result};
pub use parse::{ParsePipeline, ParseResult};
