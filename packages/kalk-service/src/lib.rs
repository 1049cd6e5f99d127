pub mod admin;
pub mod cache;
pub mod estimate;
pub mod history;
pub mod resolve;
pub mod time_serde;

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use qdrant_client::qdrant::{Filter, Query, QueryPointsBuilder, ScoredPoint};

use kalk_config::{Config, EmbeddingProviderConfig};
use kalk_storage::{db::Db, qdrant::QdrantStore};

use crate::cache::QueryCache;

pub use admin::{HealthReport, HealthStatus};
pub use estimate::{Estimate, EstimateRequest, SavedEstimate};
pub use history::ProjectEstimate;
pub use resolve::WorkItemQuery;

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The embedding generator collaborator: free text in, fixed-length vector out.
pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, ServiceResult<Vec<f32>>>;
}

/// The similarity backend collaborator: a vector plus equality filters in, a
/// ranked list of scored points out.
pub trait IndexProvider
where
	Self: Send + Sync,
{
	fn query<'a>(
		&'a self,
		collection: &'a str,
		vector: Vec<f32>,
		filter: Filter,
		limit: u32,
	) -> BoxFuture<'a, ServiceResult<Vec<ScoredPoint>>>;

	fn collections<'a>(&'a self) -> BoxFuture<'a, ServiceResult<Vec<String>>>;
}

#[derive(Debug)]
pub enum ServiceError {
	InvalidRequest { message: String },
	Embedding { message: String },
	Retrieval { message: String },
	Storage { message: String },
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub index: Arc<dyn IndexProvider>,
}

pub struct EstimationService {
	pub cfg: Config,
	pub db: Db,
	pub providers: Providers,
	pub cache: QueryCache,
}

struct DefaultEmbedding;

/// Default similarity backend backed by Qdrant.
pub struct QdrantIndex {
	store: QdrantStore,
}

impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidRequest { message } => write!(f, "Invalid request: {message}"),
			Self::Embedding { message } => write!(f, "Embedding error: {message}"),
			Self::Retrieval { message } => write!(f, "Retrieval error: {message}"),
			Self::Storage { message } => write!(f, "Storage error: {message}"),
		}
	}
}

impl std::error::Error for ServiceError {}

impl From<kalk_storage::Error> for ServiceError {
	fn from(err: kalk_storage::Error) -> Self {
		match err {
			kalk_storage::Error::Sqlx(err) => Self::Storage { message: err.to_string() },
			kalk_storage::Error::Qdrant(err) => Self::Retrieval { message: err.to_string() },
		}
	}
}

impl EmbeddingProvider for DefaultEmbedding {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, ServiceResult<Vec<f32>>> {
		Box::pin(async move {
			kalk_providers::embedding::embed(cfg, text)
				.await
				.map_err(|err| ServiceError::Embedding { message: err.to_string() })
		})
	}
}

impl QdrantIndex {
	pub fn new(store: QdrantStore) -> Self {
		Self { store }
	}
}

impl IndexProvider for QdrantIndex {
	fn query<'a>(
		&'a self,
		collection: &'a str,
		vector: Vec<f32>,
		filter: Filter,
		limit: u32,
	) -> BoxFuture<'a, ServiceResult<Vec<ScoredPoint>>> {
		Box::pin(async move {
			let search = QueryPointsBuilder::new(collection)
				.query(Query::new_nearest(vector))
				.filter(filter)
				.limit(u64::from(limit))
				.with_payload(true);
			let response = self
				.store
				.client
				.query(search)
				.await
				.map_err(|err| ServiceError::Retrieval { message: err.to_string() })?;

			Ok(response.result)
		})
	}

	fn collections<'a>(&'a self) -> BoxFuture<'a, ServiceResult<Vec<String>>> {
		Box::pin(async move {
			let response = self
				.store
				.client
				.list_collections()
				.await
				.map_err(|err| ServiceError::Retrieval { message: err.to_string() })?;

			Ok(response.collections.into_iter().map(|collection| collection.name).collect())
		})
	}
}

impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>, index: Arc<dyn IndexProvider>) -> Self {
		Self { embedding, index }
	}
}

impl EstimationService {
	pub fn new(cfg: Config, db: Db, qdrant: QdrantStore) -> Self {
		let providers =
			Providers::new(Arc::new(DefaultEmbedding), Arc::new(QdrantIndex::new(qdrant)));

		Self::with_providers(cfg, db, providers)
	}

	pub fn with_providers(cfg: Config, db: Db, providers: Providers) -> Self {
		let cache = QueryCache::new(Duration::from_secs(cfg.cache.ttl_secs));

		Self { cfg, db, providers, cache }
	}
}
