use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// Requests an embedding vector for the given text. The wait is bounded by the
/// configured timeout; a timeout surfaces as a transport error.
pub async fn embed(cfg: &kalk_config::EmbeddingProviderConfig, text: &str) -> Result<Vec<f32>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({ "text": text });
	let res = client.post(url).json(&body).send().await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_embedding_response(json)
}

fn parse_embedding_response(json: Value) -> Result<Vec<f32>> {
	let embedding = json.get("embedding").and_then(|v| v.as_array()).ok_or_else(|| {
		Error::InvalidResponse {
			message: "Embedding response is missing the embedding array.".to_string(),
		}
	})?;
	let mut vec = Vec::with_capacity(embedding.len());

	for value in embedding {
		let number = value.as_f64().ok_or_else(|| Error::InvalidResponse {
			message: "Embedding value must be numeric.".to_string(),
		})?;

		vec.push(number as f32);
	}

	Ok(vec)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_a_well_formed_response() {
		let json = serde_json::json!({ "embedding": [0.5, -1.5, 2.0] });
		let parsed = parse_embedding_response(json).expect("parse failed");

		assert_eq!(parsed, vec![0.5, -1.5, 2.0]);
	}

	#[test]
	fn rejects_a_response_without_an_embedding_array() {
		let json = serde_json::json!({ "vector": [0.5] });

		assert!(matches!(
			parse_embedding_response(json),
			Err(Error::InvalidResponse { .. })
		));
	}

	#[test]
	fn rejects_non_numeric_embedding_values() {
		let json = serde_json::json!({ "embedding": [0.5, "oops"] });

		assert!(matches!(
			parse_embedding_response(json),
			Err(Error::InvalidResponse { .. })
		));
	}
}
