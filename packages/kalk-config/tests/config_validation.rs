use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml(mutate: impl FnOnce(&mut toml::Table)) -> String {
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let root = value.as_table_mut().expect("Template config must be a table.");

	mutate(root);

	toml::to_string(&value).expect("Failed to render template config.")
}

fn table<'a>(root: &'a mut toml::Table, path: &[&str]) -> &'a mut toml::Table {
	let mut current = root;

	for key in path {
		current = current
			.get_mut(*key)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Template config must include [{key}]."));
	}

	current
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

	path.push(format!("kalk_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load(payload: String) -> kalk_config::Result<kalk_config::Config> {
	let path = write_temp_config(payload);
	let result = kalk_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn expect_validation_error(payload: String, needle: &str) {
	let err = load(payload).expect_err("Expected a validation error.");
	let message = err.to_string();

	assert!(message.contains(needle), "Unexpected error message: {message}");
}

#[test]
fn template_config_loads() {
	let cfg = load(sample_toml(|_| {})).expect("Template config must load.");

	assert_eq!(cfg.estimation.default_region, "EE");
	assert_eq!(cfg.estimation.default_top_k, 5);
	assert_eq!(cfg.cache.ttl_secs, 3_600);
}

#[test]
fn default_region_is_trimmed_and_uppercased() {
	let payload = sample_toml(|root| {
		table(root, &["estimation"])
			.insert("default_region".to_string(), Value::String(" de ".to_string()));
	});
	let cfg = load(payload).expect("Config with lowercase region must load.");

	assert_eq!(cfg.estimation.default_region, "DE");
}

#[test]
fn embedding_dimensions_must_match_vector_dim() {
	let payload = sample_toml(|root| {
		table(root, &["providers", "embedding"])
			.insert("dimensions".to_string(), Value::Integer(384));
	});

	expect_validation_error(
		payload,
		"providers.embedding.dimensions must match storage.qdrant.vector_dim.",
	);
}

#[test]
fn labor_rate_must_be_positive() {
	let payload = sample_toml(|root| {
		table(root, &["estimation"])
			.insert("labor_rate_per_hour".to_string(), Value::Float(0.0));
	});

	expect_validation_error(
		payload,
		"estimation.labor_rate_per_hour must be a positive finite number.",
	);
}

#[test]
fn cache_ttl_must_be_positive() {
	let payload = sample_toml(|root| {
		table(root, &["cache"]).insert("ttl_secs".to_string(), Value::Integer(0));
	});

	expect_validation_error(payload, "cache.ttl_secs must be greater than zero.");
}

#[test]
fn language_collections_must_be_non_empty() {
	let payload = sample_toml(|root| {
		table(root, &["storage", "qdrant"])
			.insert("collection_de".to_string(), Value::String(String::new()));
	});

	expect_validation_error(
		payload,
		"storage.qdrant.collection_en and collection_de must be non-empty.",
	);
}

#[test]
fn history_limit_must_be_positive() {
	let payload = sample_toml(|root| {
		table(root, &["estimation"]).insert("history_limit".to_string(), Value::Integer(0));
	});

	expect_validation_error(payload, "estimation.history_limit must be greater than zero.");
}
