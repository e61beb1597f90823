use std::sync::Arc;

use bionli_service::BioNliService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<BioNliService>,
}
impl AppState {
	/// Builds the live NCBI and Ensembl clients from `config`.
	pub fn new(config: bionli_config::Config) -> color_eyre::Result<Self> {
		let service = BioNliService::new(config)?;

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: BioNliService) -> Self {
		Self { service: Arc::new(service) }
	}
}
