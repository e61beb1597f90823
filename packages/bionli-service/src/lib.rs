pub mod aggregate;
pub mod dispatch;
pub mod entities;
pub mod history;
pub mod query;
pub mod recommendations;
pub mod records;
pub mod time_serde;

mod error;

pub use aggregate::DispatchOutcome;
pub use dispatch::{DispatchSettings, ResolutionDispatcher};
pub use entities::{EntitiesRequest, EntitiesResponse};
pub use error::{Error as ServiceError, Result};
pub use history::{HistoryResponse, QueryHistory, QueryHistoryEntry};
pub use query::{QueryRequest, QueryResponse};
pub use recommendations::ServiceRecommendation;
pub use records::{RecordDetail, RecordRole, RecordStatus, RecordTag, ResultRecord};

use std::{future::Future, pin::Pin, sync::Arc};

use bionli_config::Config;
use bionli_domain::{ParsePipeline, knowledge::KnowledgeTables, species::SpeciesNormalizer};
use bionli_providers::{GeneRecord, RetryPolicy, ensembl::EnsemblClient, ncbi::NcbiClient};

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A knowledge source that can look genes up by symbol.
///
/// An empty list means "not found"; an error means the source could not answer.
pub trait GeneLookup
where
	Self: Send + Sync,
{
	fn source(&self) -> &str;

	fn find<'a>(
		&'a self,
		symbol: &'a str,
		organism: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<GeneRecord>>>;
}

/// The primary source answers every handler; secondary sources join entity lookups only.
#[derive(Clone)]
pub struct Sources {
	pub primary: Arc<dyn GeneLookup>,
	pub secondary: Vec<Arc<dyn GeneLookup>>,
}
impl Sources {
	pub fn new(primary: Arc<dyn GeneLookup>, secondary: Vec<Arc<dyn GeneLookup>>) -> Self {
		Self { primary, secondary }
	}

	/// NCBI Gene as primary, Ensembl as secondary when `[sources.ensembl].enabled`.
	pub fn from_config(cfg: &Config) -> ServiceResult<Self> {
		let retry = RetryPolicy::from_config(&cfg.dispatch);
		let primary: Arc<dyn GeneLookup> = Arc::new(NcbiClient::new(&cfg.sources.ncbi, retry)?);
		let mut secondary: Vec<Arc<dyn GeneLookup>> = Vec::new();

		if cfg.sources.ensembl.enabled {
			secondary.push(Arc::new(EnsemblClient::new(&cfg.sources.ensembl, retry)?));
		}

		Ok(Self { primary, secondary })
	}

	pub fn all(&self) -> impl Iterator<Item = &Arc<dyn GeneLookup>> {
		std::iter::once(&self.primary).chain(self.secondary.iter())
	}
}

pub struct BioNliService {
	pub cfg: Config,
	pub pipeline: ParsePipeline,
	pub tables: Arc<KnowledgeTables>,
	pub dispatcher: ResolutionDispatcher,
	pub history: QueryHistory,
}
impl BioNliService {
	pub fn new(cfg: Config) -> ServiceResult<Self> {
		let sources = Sources::from_config(&cfg)?;

		Self::with_sources(cfg, sources)
	}

	pub fn with_sources(cfg: Config, sources: Sources) -> ServiceResult<Self> {
		let pipeline = ParsePipeline::from_config(&cfg)?;
		let tables = Arc::new(KnowledgeTables::from_config(&cfg.knowledge));
		let species = SpeciesNormalizer::new(&cfg.knowledge.species);
		let settings = DispatchSettings::from_config(&cfg);
		let dispatcher = ResolutionDispatcher::new(sources, tables.clone(), species, settings);
		let history = QueryHistory::new(cfg.history.window);

		Ok(Self { cfg, pipeline, tables, dispatcher, history })
	}
}

impl GeneLookup for NcbiClient {
	fn source(&self) -> &str {
		bionli_providers::ncbi::SOURCE_NAME
	}

	fn find<'a>(
		&'a self,
		symbol: &'a str,
		organism: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<GeneRecord>>> {
		Box::pin(async move { Ok(self.find_gene(symbol, organism).await?) })
	}
}

impl GeneLookup for EnsemblClient {
	fn source(&self) -> &str {
		bionli_providers::ensembl::SOURCE_NAME
	}

	fn find<'a>(
		&'a self,
		symbol: &'a str,
		organism: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<GeneRecord>>> {
		Box::pin(async move { Ok(self.find_gene(symbol, organism).await?) })
	}
}
