use std::collections::HashMap;

use bionli_config::SpeciesAlias;

/// Key used when a species name is not recognized.
pub const DEFAULT_SPECIES_KEY: &str = "mouse";

#[derive(Clone, Debug)]
struct SpeciesInfo {
	scientific_name: String,
	key: String,
}

/// Maps common and scientific species names to a scientific name and a canonical key.
#[derive(Clone, Debug)]
pub struct SpeciesNormalizer {
	by_name: HashMap<String, SpeciesInfo>,
}
impl SpeciesNormalizer {
	pub fn new(aliases: &[SpeciesAlias]) -> Self {
		let mut by_name = HashMap::new();

		for alias in aliases {
			let info = SpeciesInfo {
				scientific_name: alias.scientific_name.clone(),
				key: alias.key.clone(),
			};

			by_name.entry(alias.scientific_name.to_lowercase()).or_insert_with(|| info.clone());
			by_name.insert(alias.name.trim().to_lowercase(), info);
		}

		Self { by_name }
	}

	pub fn scientific_name(&self, name: &str) -> Option<&str> {
		self.by_name.get(&name.trim().to_lowercase()).map(|info| info.scientific_name.as_str())
	}

	/// Canonical lowercase key for `name`, falling back to [`DEFAULT_SPECIES_KEY`].
	pub fn normalize(&self, name: &str) -> &str {
		self.by_name
			.get(&name.trim().to_lowercase())
			.map(|info| info.key.as_str())
			.unwrap_or(DEFAULT_SPECIES_KEY)
	}
}
impl Default for SpeciesNormalizer {
	fn default() -> Self {
		Self::new(&bionli_config::Knowledge::default().species)
	}
}
