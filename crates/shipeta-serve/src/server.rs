//! Router construction and the server loop.

use axum::Router;
use axum::routing::{get, post};
use shipeta_model::Predictor;
use tower_http::trace::TraceLayer;

use crate::{ServeConfig, ServeError, ValidationPolicy, handlers};

/// State shared by every request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The loaded model.
    pub predictor: Predictor,
    /// Out-of-domain handling.
    pub validation: ValidationPolicy,
}

impl AppState {
    /// Creates state with the default validation policy.
    #[must_use]
    pub fn new(predictor: Predictor) -> Self {
        Self {
            predictor,
            validation: ValidationPolicy::default(),
        }
    }

    /// Sets the validation policy.
    #[must_use]
    pub fn with_validation(mut self, validation: ValidationPolicy) -> Self {
        self.validation = validation;
        self
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(handlers::predict))
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Loads the artifact, binds `config.addr`, and serves until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the artifact cannot be loaded, the address cannot be
/// bound, or the server fails.
pub async fn serve(config: ServeConfig) -> Result<(), ServeError> {
    let predictor = Predictor::load(&config.model_path)?;
    tracing::info!(
        path = %config.model_path.display(),
        model = predictor.model_name(),
        "model loaded"
    );

    let app = router(AppState::new(predictor).with_validation(config.validation));

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|source| ServeError::Bind {
            addr: config.addr,
            source,
        })?;
    tracing::info!(addr = %config.addr, validation = %config.validation, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(%err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use shipeta_model::{
        Artifact, EstimatorState, ForestConfig, LinearRegression, ModelConfig, save, train,
    };
    use shipeta_types::{FeatureVector, TrainingExample, TrainingSet};
    use tower::ServiceExt;

    use crate::{HealthResponse, PredictResponse};

    /// 1 day plus 1 day per 1000 km, regardless of mode and container.
    fn linear_state() -> AppState {
        AppState::new(Predictor::new(LinearRegression::new(1.0, [0.001, 0.0, 0.0])))
    }

    async fn post_predict(app: Router, body: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_predict_ok() {
        let (status, body) = post_predict(
            router(linear_state()),
            r#"{"distance_km": 8000, "transport_mode": 0, "container_type": 40}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let response: PredictResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.estimated_delivery_days, 9.0);
    }

    #[tokio::test]
    async fn test_predict_rounds() {
        let (status, body) = post_predict(
            router(linear_state()),
            r#"{"distance_km": 1234.5678, "transport_mode": 1, "container_type": 20}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["estimated_delivery_days"], 2.23);
    }

    #[tokio::test]
    async fn test_passthrough_accepts_out_of_domain() {
        let (status, body) = post_predict(
            router(linear_state()),
            r#"{"distance_km": -500, "transport_mode": 7, "container_type": 45}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["estimated_delivery_days"], 0.5);
    }

    #[tokio::test]
    async fn test_reject_policy_returns_422() {
        let app = router(linear_state().with_validation(ValidationPolicy::Reject));
        for body in [
            r#"{"distance_km": 8000, "transport_mode": 7, "container_type": 40}"#,
            r#"{"distance_km": 8000, "transport_mode": 0, "container_type": 45}"#,
            r#"{"distance_km": 0, "transport_mode": 0, "container_type": 40}"#,
        ] {
            let (status, json) = post_predict(app.clone(), body).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert!(json["error"].is_string());
        }

        let (status, _) = post_predict(
            app,
            r#"{"distance_km": 8000, "transport_mode": 2, "container_type": 20}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_bodies() {
        let app = router(linear_state());

        let (status, json) = post_predict(app.clone(), "not json").await;
        assert!(status.is_client_error());
        assert!(json["error"].is_string());

        let (status, json) = post_predict(app.clone(), r#"{"distance_km": 8000}"#).await;
        assert!(status.is_client_error());
        assert!(json["error"].as_str().unwrap().contains("transport_mode"));

        let (status, _) = post_predict(
            app,
            r#"{"distance_km": "far", "transport_mode": 0, "container_type": 40}"#,
        )
        .await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_huge_estimate_is_a_number() {
        let identity = AppState::new(Predictor::new(LinearRegression::new(0.0, [1.0, 0.0, 0.0])));
        let (status, body) = post_predict(
            router(identity),
            r#"{"distance_km": 1e308, "transport_mode": 0, "container_type": 40}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["estimated_delivery_days"].as_f64(), Some(1e308));
    }

    #[tokio::test]
    async fn test_integral_float_codes_are_accepted() {
        let app = router(linear_state());
        let (status, as_floats) = post_predict(
            app.clone(),
            r#"{"distance_km": 8000, "transport_mode": 0.0, "container_type": 40.0}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, as_integers) = post_predict(
            app,
            r#"{"distance_km": 8000, "transport_mode": 0, "container_type": 40}"#,
        )
        .await;
        assert_eq!(as_floats, as_integers);
    }

    #[tokio::test]
    async fn test_fractional_codes_are_rejected() {
        let app = router(linear_state());
        for body in [
            r#"{"distance_km": 8000, "transport_mode": 0.5, "container_type": 40}"#,
            r#"{"distance_km": 8000, "transport_mode": 0, "container_type": 1e300}"#,
            r#"{"distance_km": 8000, "transport_mode": "0", "container_type": 40}"#,
        ] {
            let (status, json) = post_predict(app.clone(), body).await;
            assert!(status.is_client_error(), "{body} gave {status}");
            assert!(json["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = router(linear_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.model, "linear");
    }

    #[tokio::test]
    async fn test_served_value_matches_loaded_artifact() {
        let set: TrainingSet = (0..60)
            .map(|i| {
                let distance = 400.0 + 190.0 * f64::from(i);
                TrainingExample::new(
                    FeatureVector::encode(distance, i64::from(i % 3), 20 + 20 * i64::from(i % 2)),
                    distance / 500.0 + 2.0,
                )
            })
            .collect();
        let config = ModelConfig::Forest(ForestConfig::default().with_trees(8));
        let state: EstimatorState = train(&config, &set).unwrap();

        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("model.bin");
        save(&Artifact::new(state, set.len(), config.seed()), &path).unwrap();
        let predictor = Predictor::load(&path).unwrap();
        let expected = predictor.predict(8000.0, 0, 40);

        let (status, body) = post_predict(
            router(AppState::new(predictor)),
            r#"{"distance_km": 8000, "transport_mode": 0, "container_type": 40}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["estimated_delivery_days"], expected);
    }

    #[tokio::test]
    async fn test_serve_fails_without_artifact() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = ServeConfig::new(temp.path().join("missing.bin"));
        assert!(matches!(serve(config).await, Err(ServeError::Artifact(_))));
    }
}
