use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::BioNliService;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryHistoryEntry {
	pub query: String,
	#[serde(with = "crate::time_serde")]
	pub timestamp: OffsetDateTime,
	pub result_count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
	pub history: Vec<QueryHistoryEntry>,
	pub total_queries: usize,
}

/// Append-only log of processed queries. Reads return the most recent `window` entries.
pub struct QueryHistory {
	entries: Mutex<Vec<QueryHistoryEntry>>,
	window: usize,
}
impl QueryHistory {
	pub fn new(window: usize) -> Self {
		Self { entries: Mutex::new(Vec::new()), window }
	}

	pub async fn append(&self, entry: QueryHistoryEntry) {
		self.entries.lock().await.push(entry);
	}

	pub async fn recent(&self) -> HistoryResponse {
		let entries = self.entries.lock().await;
		let start = entries.len().saturating_sub(self.window);

		HistoryResponse { history: entries[start..].to_vec(), total_queries: entries.len() }
	}
}

impl BioNliService {
	pub async fn history(&self) -> HistoryResponse {
		self.history.recent().await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn entry(query: &str) -> QueryHistoryEntry {
		QueryHistoryEntry {
			query: query.to_string(),
			timestamp: OffsetDateTime::UNIX_EPOCH,
			result_count: 1,
		}
	}

	#[tokio::test]
	async fn reads_keep_the_latest_window() {
		let history = QueryHistory::new(2);

		for query in ["a", "b", "c"] {
			history.append(entry(query)).await;
		}

		let recent = history.recent().await;
		let queries: Vec<_> = recent.history.iter().map(|entry| entry.query.as_str()).collect();

		assert_eq!(queries, vec!["b", "c"]);
		assert_eq!(recent.total_queries, 3);
	}

	#[tokio::test]
	async fn empty_history_reads_cleanly() {
		let recent = QueryHistory::new(10).recent().await;

		assert!(recent.history.is_empty());
		assert_eq!(recent.total_queries, 0);
	}
}
