mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Cache, Config, EmbeddingProviderConfig, Estimation, Postgres, Providers, Qdrant, Service,
	Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.admin_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.admin_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.qdrant.collection_en.trim().is_empty()
		|| cfg.storage.qdrant.collection_de.trim().is_empty()
	{
		return Err(Error::Validation {
			message: "storage.qdrant.collection_en and collection_de must be non-empty.".to_string(),
		});
	}
	if cfg.storage.qdrant.vector_dim == 0 {
		return Err(Error::Validation {
			message: "storage.qdrant.vector_dim must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}
	if cfg.providers.embedding.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if !cfg.estimation.labor_rate_per_hour.is_finite()
		|| cfg.estimation.labor_rate_per_hour <= 0.0
	{
		return Err(Error::Validation {
			message: "estimation.labor_rate_per_hour must be a positive finite number.".to_string(),
		});
	}
	if cfg.estimation.default_region.is_empty() {
		return Err(Error::Validation {
			message: "estimation.default_region must be non-empty.".to_string(),
		});
	}
	if cfg.estimation.default_top_k == 0 {
		return Err(Error::Validation {
			message: "estimation.default_top_k must be greater than zero.".to_string(),
		});
	}
	if cfg.estimation.history_limit <= 0 {
		return Err(Error::Validation {
			message: "estimation.history_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.cache.ttl_secs == 0 {
		return Err(Error::Validation {
			message: "cache.ttl_secs must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.estimation.default_region = cfg.estimation.default_region.trim().to_uppercase();
}
