// File: services/eximbay_backend/src/lib.rs
use axum::{routing::get, Router};
use eximbay_common::{EximbayError, GatewayClient};
use eximbay_config::AppConfig;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Assembles the full application router from loaded configuration.
///
/// Missing credentials do not prevent startup; the affected flow refuses
/// each request instead.
pub fn build_app(config: Arc<AppConfig>) -> Result<Router, EximbayError> {
    let missing = config.eximbay.missing_credentials();
    if !missing.is_empty() {
        warn!(
            "Eximbay credentials not configured: {}. Flows using them will refuse requests.",
            missing.join(", ")
        );
    }

    let gateway = GatewayClient::new(config.http.timeout_secs)?;
    info!(
        "Gateway client ready (timeout {}s, ready endpoint {})",
        config.http.timeout_secs, config.eximbay.api_ready_url
    );

    #[allow(unused_mut)] // for the features it needs to be mutable
    let mut app = Router::new()
        .route("/", get(|| async { "Eximbay payment testbed" }))
        .merge(eximbay_payment::routes(config.clone(), Arc::new(gateway)));

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use eximbay_payment::doc::PaymentApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Eximbay Testbed API",
                version = "0.1.0",
                description = "Payment ready, token rebill and gateway callbacks"
            ),
            components(),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(PaymentApiDoc::openapi());
        info!("Adding Swagger UI at /docs");

        app = app.merge(SwaggerUi::new("/docs").url("/docs/openapi.json", openapi_doc));
    }

    Ok(app.layer(TraceLayer::new_for_http()))
}
