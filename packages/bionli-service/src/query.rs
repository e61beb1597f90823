use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use bionli_domain::ParseResult;

use crate::{
	BioNliService, ServiceError, ServiceResult,
	aggregate::DispatchOutcome,
	history::QueryHistoryEntry,
	recommendations::{self, ServiceRecommendation},
};

#[derive(Clone, Debug, Deserialize)]
pub struct QueryRequest {
	pub query: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct QueryResponse {
	pub request_id: Uuid,
	pub query_analysis: ParseResult,
	pub database_results: DispatchOutcome,
	pub service_recommendations: Vec<ServiceRecommendation>,
	pub suggested_queries: Vec<String>,
	#[serde(with = "crate::time_serde")]
	pub timestamp: OffsetDateTime,
}

impl BioNliService {
	/// Parses, resolves, and records one question.
	pub async fn query(&self, req: QueryRequest) -> ServiceResult<QueryResponse> {
		if req.query.trim().is_empty() {
			return Err(ServiceError::InvalidRequest {
				message: "query must be a non-empty string.".to_string(),
			});
		}

		let request_id = Uuid::new_v4();
		let parsed = self.pipeline.parse(&req.query);

		tracing::info!(
			%request_id,
			query_type = parsed.query_type.as_str(),
			confidence = parsed.confidence,
			entities = parsed.entities.len(),
			"Query parsed."
		);

		let database_results = self.dispatcher.dispatch(&parsed).await;
		let service_recommendations = recommendations::recommend(&parsed, &self.tables);
		let suggested_queries = recommendations::suggest(&parsed);
		let timestamp = OffsetDateTime::now_utc();

		self.history
			.append(QueryHistoryEntry {
				query: req.query,
				timestamp,
				result_count: database_results.len(),
			})
			.await;

		tracing::info!(%request_id, results = database_results.len(), "Query resolved.");

		Ok(QueryResponse {
			request_id,
			query_analysis: parsed,
			database_results,
			service_recommendations,
			suggested_queries,
			timestamp,
		})
	}
}
