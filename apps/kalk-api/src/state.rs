use std::sync::Arc;

use kalk_service::EstimationService;
use kalk_storage::{db::Db, qdrant::QdrantStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<EstimationService>,
}
impl AppState {
	pub async fn new(config: kalk_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let qdrant = QdrantStore::new(&config.storage.qdrant)?;
		let service = EstimationService::new(config, db, qdrant);

		Ok(Self { service: Arc::new(service) })
	}
}
