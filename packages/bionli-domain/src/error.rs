pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to compile {kind} pattern {pattern:?}.")]
	Pattern { kind: &'static str, pattern: String, source: regex::Error },
}

pub(crate) fn compile(kind: &'static str, pattern: &str) -> Result<regex::Regex> {
	regex::Regex::new(pattern)
		.map_err(|err| Error::Pattern { kind, pattern: pattern.to_string(), source: err })
}
