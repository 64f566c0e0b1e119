/*
 * Responsibility
 * - Config loading -> settings resolution -> Router assembly
 * - Middleware (trace / request id / security headers + nonce)
 * - Start serving with axum::serve()
 */
use std::sync::Arc;

use anyhow::Result;
use axum::{
    Json, Router,
    http::HeaderName,
    response::{Html, IntoResponse},
    routing::get,
};
use serde::Serialize;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use security_headers::{CspNonce, DEFAULT_SECTION, SecurityHeadersSettings, middleware};

use crate::config::Config;

pub async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("security_headers=debug,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let app_env = config.app_env;

    let settings = SecurityHeadersSettings::from_config_with(
        &config.security_headers,
        DEFAULT_SECTION,
        |s| {
            // Swagger-style docs ship inline scripts without a nonce.
            s.content_security_policy_ignore_urls.push("/docs/".to_string());
            if !app_env.is_production() {
                // Keep local sessions alive across reloads.
                s.use_clear_site_data = false;
            }
        },
    )?;

    tracing::info!(
        addr = %config.addr,
        env = ?app_env,
        csp = settings
            .content_security_policy
            .as_ref()
            .map(|p| p.policy_string())
            .unwrap_or_default(),
        "security headers resolved"
    );

    let app = build_router(Arc::new(settings));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(settings: Arc<SecurityHeadersSettings>) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");

    let router = Router::new()
        .route("/", get(index))
        .route("/docs/index.html", get(docs))
        .route("/healthz", get(health));

    middleware::apply(router, settings)
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
}

async fn index(nonce: CspNonce) -> impl IntoResponse {
    Html(format!(
        "<!doctype html>\n<html>\n<head><title>security-headers</title></head>\n<body>\n\
         <p id=\"status\">loading</p>\n\
         <script {}>document.getElementById('status').textContent = 'ok';</script>\n\
         </body>\n</html>\n",
        nonce.attribute()
    ))
}

async fn docs() -> Html<&'static str> {
    Html(
        "<!doctype html>\n<html><body><script>document.write('docs');</script></body></html>\n",
    )
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}
