use crate::Result;

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection_en: String,
	pub collection_de: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &kalk_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self {
			client,
			collection_en: cfg.collection_en.clone(),
			collection_de: cfg.collection_de.clone(),
			vector_dim: cfg.vector_dim,
		})
	}
}
