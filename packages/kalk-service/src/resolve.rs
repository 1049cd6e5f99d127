//! Similarity resolution. Turns free-text work descriptions into ranked
//! catalog matches, memoized through the query cache.

use qdrant_client::qdrant::{
	Condition, Filter, ScoredPoint, Value as QdrantValue, point_id::PointIdOptions, value::Kind,
};
use serde::Deserialize;
use serde_json::Value;

use kalk_config::Qdrant;
use kalk_domain::{CatalogMatch, DEFAULT_PHASE, Language, similarity_percent};

use crate::{EstimationService, ServiceError, ServiceResult, cache::CacheKey};

/// A single free-text catalog search.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkItemQuery {
	pub query: String,
	pub language: Language,
	#[serde(default)]
	pub region: Option<String>,
	#[serde(default)]
	pub top_k: Option<u32>,
}

pub(crate) fn collection_for(qdrant: &Qdrant, language: Language) -> &str {
	match language {
		Language::En => &qdrant.collection_en,
		Language::De => &qdrant.collection_de,
	}
}

impl EstimationService {
	/// Resolves a work-item description against the catalog partition for the
	/// requested language. Results keep the backend's rank order and are served
	/// from the cache when a fresh entry exists.
	pub async fn search_work_items(
		&self,
		request: &WorkItemQuery,
	) -> ServiceResult<Vec<CatalogMatch>> {
		let query = request.query.trim();

		if query.is_empty() {
			return Err(ServiceError::InvalidRequest {
				message: "Query text must not be empty.".to_string(),
			});
		}

		let region = self.effective_region(request.region.as_deref());
		let top_k = request.top_k.unwrap_or(self.cfg.estimation.default_top_k).max(1);

		self.resolve(query, request.language, &region, top_k).await
	}

	pub(crate) fn effective_region(&self, region: Option<&str>) -> String {
		region
			.map(str::trim)
			.filter(|region| !region.is_empty())
			.unwrap_or(&self.cfg.estimation.default_region)
			.to_uppercase()
	}

	pub(crate) async fn resolve(
		&self,
		query: &str,
		language: Language,
		region: &str,
		top_k: u32,
	) -> ServiceResult<Vec<CatalogMatch>> {
		let key = CacheKey::new(language, region, query);

		if let Some(matches) = self.cache.get(&key) {
			tracing::debug!(
				query,
				language = language.as_str(),
				region,
				"Serving catalog matches from cache."
			);

			return Ok(matches);
		}

		let vector = self.providers.embedding.embed(&self.cfg.providers.embedding, query).await?;
		let expected_dim = self.cfg.providers.embedding.dimensions as usize;

		if vector.len() != expected_dim {
			return Err(ServiceError::Embedding {
				message: format!(
					"Embedding provider returned {} dimensions while {expected_dim} were expected.",
					vector.len()
				),
			});
		}

		let collection = collection_for(&self.cfg.storage.qdrant, language);
		let filter = Filter::all([
			Condition::matches("region", region.to_string()),
			Condition::matches("language", language.as_str().to_string()),
		]);
		let points = self.providers.index.query(collection, vector, filter, top_k).await?;
		let matches = points.iter().map(catalog_match_from_point).collect::<Vec<_>>();

		self.cache.put(key, matches.clone());

		Ok(matches)
	}
}

/// Normalizes a scored point into a catalog match. Missing payload fields fall
/// back to neutral values rather than failing the whole result list.
fn catalog_match_from_point(point: &ScoredPoint) -> CatalogMatch {
	let phase = payload_str(point, "phase")
		.filter(|phase| !phase.trim().is_empty())
		.unwrap_or_else(|| DEFAULT_PHASE.to_string());
	let materials = point
		.payload
		.get("materials")
		.map(qdrant_value_to_json)
		.unwrap_or(Value::Object(serde_json::Map::new()));

	CatalogMatch {
		id: point_id_to_json(point),
		similarity_percent: similarity_percent(point.score),
		description: payload_str(point, "description").unwrap_or_default(),
		category: payload_str(point, "category").unwrap_or_default(),
		phase,
		labor_hours: payload_f64(point, "labor_hours").unwrap_or(0.0).max(0.0),
		estimated_unit_cost: payload_f64(point, "estimated_cost").unwrap_or(0.0).max(0.0),
		materials,
	}
}

fn payload_str(point: &ScoredPoint, field: &str) -> Option<String> {
	match point.payload.get(field)?.kind.as_ref()? {
		Kind::StringValue(value) => Some(value.clone()),
		_ => None,
	}
}

fn payload_f64(point: &ScoredPoint, field: &str) -> Option<f64> {
	match point.payload.get(field)?.kind.as_ref()? {
		Kind::DoubleValue(value) => Some(*value),
		Kind::IntegerValue(value) => Some(*value as f64),
		_ => None,
	}
}

fn point_id_to_json(point: &ScoredPoint) -> Value {
	match point.id.as_ref().and_then(|id| id.point_id_options.as_ref()) {
		Some(PointIdOptions::Num(num)) => Value::from(*num),
		Some(PointIdOptions::Uuid(uuid)) => Value::from(uuid.clone()),
		None => Value::Null,
	}
}

fn qdrant_value_to_json(value: &QdrantValue) -> Value {
	match value.kind.as_ref() {
		Some(Kind::DoubleValue(value)) => {
			serde_json::Number::from_f64(*value).map(Value::Number).unwrap_or(Value::Null)
		},
		Some(Kind::IntegerValue(value)) => Value::from(*value),
		Some(Kind::StringValue(value)) => Value::from(value.clone()),
		Some(Kind::BoolValue(value)) => Value::from(*value),
		Some(Kind::StructValue(fields)) => Value::Object(
			fields
				.fields
				.iter()
				.map(|(key, value)| (key.clone(), qdrant_value_to_json(value)))
				.collect(),
		),
		Some(Kind::ListValue(values)) =>
			Value::Array(values.values.iter().map(qdrant_value_to_json).collect()),
		Some(Kind::NullValue(_)) | None => Value::Null,
	}
}
