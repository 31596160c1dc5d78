//! HTTP host: shared middleware stack, health and docs endpoints, and the
//! server loop that runs until its cancellation token fires.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::extract::Extension;
use axum::http::{StatusCode, Uri};
use axum::{middleware::from_fn, routing::get, Json, Router};
use modkit::{Problem, ProblemResponse};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

mod config;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;
use request_id::XRequestId;

pub const NAME: &str = "api_ingress";

/// Owns the HTTP server for the application router.
pub struct ApiIngress {
    config: Arc<ApiIngressConfig>,
}

impl Default for ApiIngress {
    fn default() -> Self {
        Self::new(ApiIngressConfig::default())
    }
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> Arc<ApiIngressConfig> {
        self.config.clone()
    }

    /// Wrap the application routes with host endpoints and the middleware stack.
    ///
    /// Request order, outermost first:
    /// SetRequestId -> PropagateRequestId -> push_req_id_to_extensions -> Trace -> Timeout -> CORS -> BodyLimit
    pub fn build_router(&self, app: Router, openapi: Option<utoipa::openapi::OpenApi>) -> Router {
        let cfg = self.config();
        let mut router = Router::new()
            .route("/health", get(web::health_check))
            .merge(app);

        match openapi {
            Some(doc) if cfg.enable_docs => {
                let doc = Arc::new(doc);
                router = router
                    .route(
                        "/openapi.json",
                        get(move || {
                            let doc = doc.clone();
                            async move { Json((*doc).clone()) }
                        }),
                    )
                    .route("/docs", get(web::serve_docs));
            }
            _ => tracing::debug!("API docs disabled"),
        }

        router = router.fallback(not_found);

        // Added innermost first.
        router = router.layer(RequestBodyLimitLayer::new(cfg.body_limit_bytes));
        if cfg.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }
        let x_request_id = request_id::header();
        router
            .layer(TimeoutLayer::new(Duration::from_secs(cfg.request_timeout_secs)))
            .layer(request_id::create_trace_layer())
            .layer(from_fn(request_id::push_req_id_to_extensions))
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId))
    }

    /// Bind `bind_addr` and serve `router` until `cancel` fires.
    pub async fn serve(&self, router: Router, cancel: CancellationToken) -> Result<()> {
        let cfg = self.config();
        let addr: SocketAddr = cfg
            .bind_addr
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address '{}': {}", cfg.bind_addr, e))?;
        let listener = TcpListener::bind(addr).await?;
        self.serve_on(listener, router, cancel).await
    }

    /// Serve on an already bound listener.
    pub async fn serve_on(
        &self,
        listener: TcpListener,
        router: Router,
        cancel: CancellationToken,
    ) -> Result<()> {
        tracing::info!("HTTP server bound on {}", listener.local_addr()?);

        let shutdown = {
            let cancel = cancel.clone();
            async move {
                cancel.cancelled().await;
                tracing::info!("HTTP server shutting down gracefully (cancellation)");
            }
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}

async fn not_found(uri: Uri, rid: Option<Extension<XRequestId>>) -> ProblemResponse {
    let mut problem = Problem::new(
        StatusCode::NOT_FOUND,
        "Not Found",
        format!("No route for {}", uri.path()),
    )
    .with_code("api_ingress.route.not_found.v1")
    .with_instance(uri.path());
    if let Some(Extension(XRequestId(id))) = rid {
        problem = problem.with_request_id(id);
    }
    problem.into()
}
