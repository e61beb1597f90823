use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use bionli_config::{Config, Error};

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

fn sample_with(section: &str, key: &str, value: Value) -> String {
	let mut root: Value = toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let mut table = root.as_table_mut().expect("Sample config must be a table.");

	for part in section.split('.') {
		table = table
			.get_mut(part)
			.and_then(Value::as_table_mut)
			.expect("Sample config must include the requested section.");
	}

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render sample config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("bionli_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> bionli_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = bionli_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn expect_message(result: bionli_config::Result<Config>, needle: &str) {
	let err = result.expect_err("Expected a validation error.");
	let message = err.to_string();

	assert!(message.contains(needle), "Unexpected error message: {message}");
}

#[test]
fn sample_config_loads_and_normalizes() {
	let cfg = load_payload(SAMPLE_CONFIG_TOML.to_string()).expect("Sample config must load.");

	assert!(cfg.sources.ncbi.api_key.is_none());
	assert_eq!(cfg.sources.ensembl.api_base, "https://rest.ensembl.org");
	assert_eq!(cfg.recognizer.lexicon.len(), 1);
	assert_eq!(cfg.recognizer.lexicon[0].term, "hemoglobin");
	assert_eq!(cfg.history.window, 10);
}

#[test]
fn knowledge_defaults_apply_when_section_is_missing() {
	let cfg = load_payload(SAMPLE_CONFIG_TOML.to_string()).expect("Sample config must load.");

	assert_eq!(cfg.knowledge.immune_genes.first().map(String::as_str), Some("TLR3"));
	assert_eq!(cfg.knowledge.cancer_genes.len(), 8);
	assert_eq!(cfg.knowledge.fallback_pathways.len(), 3);
	assert!(cfg.knowledge.homologs.iter().any(|entry| entry.symbol == "TP53"
		&& entry.orthologs.get("mouse").map(String::as_str) == Some("Trp53")));
	assert!(cfg.knowledge.species.iter().any(|alias| alias.name == "mice" && alias.key == "mouse"));
}

#[test]
fn knowledge_tables_can_be_overridden() {
	let payload = format!(
		"{SAMPLE_CONFIG_TOML}\n[knowledge]\ncancer_genes = [\"KRAS\"]\n"
	);
	let cfg = load_payload(payload).expect("Config with knowledge override must load.");

	assert_eq!(cfg.knowledge.cancer_genes, vec!["KRAS".to_string()]);
	assert_eq!(cfg.knowledge.immune_genes.len(), 17);
}

#[test]
fn empty_knowledge_panel_is_rejected() {
	let payload = format!("{SAMPLE_CONFIG_TOML}\n[knowledge]\nimmune_genes = []\n");
	let result = load_payload(payload);

	assert!(matches!(result, Err(Error::Knowledge { table: "immune_genes", .. })));
}

#[test]
fn http_bind_must_be_non_empty() {
	let payload = sample_with("service", "http_bind", Value::String(" ".to_string()));

	expect_message(load_payload(payload), "service.http_bind must be non-empty.");
}

#[test]
fn api_base_must_be_http() {
	let payload =
		sample_with("sources.ncbi", "api_base", Value::String("ftp://example.org".to_string()));

	expect_message(
		load_payload(payload),
		"sources.ncbi.api_base must start with http:// or https://.",
	);
}

#[test]
fn call_timeout_must_be_positive() {
	let payload = sample_with("dispatch", "call_timeout_ms", Value::Integer(0));

	expect_message(load_payload(payload), "dispatch.call_timeout_ms must be greater than zero.");
}

#[test]
fn retries_are_bounded() {
	let payload = sample_with("dispatch", "max_retries", Value::Integer(9));

	expect_message(load_payload(payload), "dispatch.max_retries must be 3 or less.");
}

#[test]
fn history_window_must_be_positive() {
	let payload = sample_with("history", "window", Value::Integer(0));

	expect_message(load_payload(payload), "history.window must be greater than zero.");
}

#[test]
fn unknown_lexicon_category_is_rejected() {
	let payload = format!(
		"{SAMPLE_CONFIG_TOML}\n[[recognizer.lexicon]]\nterm = \"CD4\"\ncategory = \"pathway\"\n"
	);

	expect_message(load_payload(payload), "must be one of gene, protein, organism, or cell_type.");
}

#[test]
fn missing_file_reports_read_error() {
	let result = bionli_config::load(&env::temp_dir().join("bionli_config_missing.toml"));

	assert!(matches!(result, Err(Error::ReadConfig { .. })));
}

#[test]
fn malformed_toml_reports_parse_error() {
	let result = load_payload("[service\nhttp_bind = ".to_string());

	assert!(matches!(result, Err(Error::ParseConfig { .. })));
}
