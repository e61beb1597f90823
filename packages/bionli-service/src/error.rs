pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Pipeline error: {message}")]
	Pipeline { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
}
impl From<bionli_domain::Error> for Error {
	fn from(err: bionli_domain::Error) -> Self {
		Self::Pipeline { message: err.to_string() }
	}
}

impl From<bionli_providers::Error> for Error {
	fn from(err: bionli_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
