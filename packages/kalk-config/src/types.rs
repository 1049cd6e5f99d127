use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub estimation: Estimation,
	pub cache: Cache,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub qdrant: Qdrant,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

/// One catalog collection exists per supported language.
#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection_en: String,
	pub collection_de: String,
	pub vector_dim: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub api_base: String,
	pub path: String,
	pub dimensions: u32,
	#[serde(default = "default_embedding_timeout_ms")]
	pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Estimation {
	/// Hourly labor rate applied to catalog labor hours when costing an element.
	pub labor_rate_per_hour: f64,
	pub default_region: String,
	#[serde(default = "default_top_k")]
	pub default_top_k: u32,
	#[serde(default = "default_history_limit")]
	pub history_limit: i64,
}

#[derive(Debug, Deserialize)]
pub struct Cache {
	#[serde(default = "default_cache_ttl_secs")]
	pub ttl_secs: u64,
}

fn default_embedding_timeout_ms() -> u64 {
	5_000
}

fn default_top_k() -> u32 {
	5
}

fn default_history_limit() -> i64 {
	20
}

fn default_cache_ttl_secs() -> u64 {
	3_600
}
