pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error("{source_name} responded with HTTP {status}.")]
	Status { source_name: &'static str, status: u16 },
	#[error("{message}")]
	InvalidResponse { message: String },
}
impl Error {
	/// Timeouts, connection failures, 429 and 5xx responses are worth another attempt.
	pub fn is_transient(&self) -> bool {
		match self {
			Self::Reqwest(err) => err.is_timeout() || err.is_connect(),
			Self::Status { status, .. } => *status == 429 || *status >= 500,
			Self::SerdeJson(_) | Self::InvalidResponse { .. } => false,
		}
	}
}
