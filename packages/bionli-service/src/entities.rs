use serde::{Deserialize, Serialize};

use bionli_domain::{Entities, QueryType};

use crate::{BioNliService, ServiceResult};

#[derive(Clone, Debug, Deserialize)]
pub struct EntitiesRequest {
	pub text: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct EntitiesResponse {
	pub entities: Entities,
	pub query_type: QueryType,
}

impl BioNliService {
	/// Runs the parse pipeline without touching any knowledge source or the history.
	pub fn extract_entities(&self, req: EntitiesRequest) -> ServiceResult<EntitiesResponse> {
		let parsed = self.pipeline.parse(&req.text);

		tracing::debug!(
			entities = parsed.entities.len(),
			query_type = parsed.query_type.as_str(),
			"Entities extracted."
		);

		Ok(EntitiesResponse { entities: parsed.entities, query_type: parsed.query_type })
	}
}
