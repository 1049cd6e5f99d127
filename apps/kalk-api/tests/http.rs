use std::env;

use axum::{
	body::{self, Body},
	http::{Request, StatusCode},
};
use tower::util::ServiceExt;

use kalk_api::{routes, state::AppState};
use kalk_config::{
	Cache, Config, EmbeddingProviderConfig, Estimation, Postgres, Providers, Qdrant, Service,
	Storage,
};
use kalk_testkit::TestDatabase;

fn test_config(dsn: String, qdrant_url: String) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			admin_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		storage: Storage {
			postgres: Postgres { dsn, pool_max_conns: 1 },
			qdrant: Qdrant {
				url: qdrant_url,
				collection_en: "kalk_http_test_en".to_string(),
				collection_de: "kalk_http_test_de".to_string(),
				vector_dim: 4,
			},
		},
		providers: Providers {
			embedding: EmbeddingProviderConfig {
				api_base: "http://127.0.0.1:1".to_string(),
				path: "/embed".to_string(),
				dimensions: 4,
				timeout_ms: 1_000,
			},
		},
		estimation: Estimation {
			labor_rate_per_hour: 50.0,
			default_region: "EE".to_string(),
			default_top_k: 5,
			history_limit: 20,
		},
		cache: Cache { ttl_secs: 3_600 },
	}
}

async fn test_env() -> Option<(TestDatabase, String)> {
	let base_dsn = match kalk_testkit::env_dsn() {
		Some(value) => value,
		None => {
			eprintln!("Skipping HTTP tests; set KALK_PG_DSN to run this test.");

			return None;
		},
	};
	let qdrant_url = match env::var("KALK_QDRANT_URL") {
		Ok(value) => value,
		Err(_) => {
			eprintln!("Skipping HTTP tests; set KALK_QDRANT_URL to run this test.");

			return None;
		},
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");

	Some((test_db, qdrant_url))
}

#[tokio::test]
#[ignore = "Requires external Postgres and Qdrant. Set KALK_PG_DSN and KALK_QDRANT_URL to run."]
async fn health_reports_backend_state() {
	let Some((test_db, qdrant_url)) = test_env().await else {
		return;
	};
	let config = test_config(test_db.dsn().to_string(), qdrant_url);
	let state = AppState::new(config).await.expect("Failed to initialize app state.");
	let app = routes::router(state.clone());
	let _ = routes::admin_router(state);
	let response = app
		.oneshot(
			Request::builder().uri("/health").body(Body::empty()).expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /health.");

	// The test collections are not provisioned, so the probe itself must
	// answer either way.
	assert!(matches!(response.status(), StatusCode::OK | StatusCode::SERVICE_UNAVAILABLE));

	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json: serde_json::Value = serde_json::from_slice(&bytes).expect("Failed to parse response.");

	assert!(json["status"].is_string());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres and Qdrant. Set KALK_PG_DSN and KALK_QDRANT_URL to run."]
async fn rejects_estimate_without_elements() {
	let Some((test_db, qdrant_url)) = test_env().await else {
		return;
	};
	let config = test_config(test_db.dsn().to_string(), qdrant_url);
	let state = AppState::new(config).await.expect("Failed to initialize app state.");
	let app = routes::router(state);
	let payload = serde_json::json!({
		"project_id": "proj-1",
		"elements": [],
		"language": "en"
	});
	let response = app
		.oneshot(
			Request::builder()
				.method("POST")
				.uri("/v1/estimations/from-elements")
				.header("content-type", "application/json")
				.body(Body::from(payload.to_string()))
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call from-elements.");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json: serde_json::Value = serde_json::from_slice(&bytes).expect("Failed to parse response.");

	assert_eq!(json["error_code"], "invalid_request");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
