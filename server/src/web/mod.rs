use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::storage::{self, StorageConfig, TodoRepository};
use crate::todo::api::{TodoState, create_todo_router};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::todo::api::list_todos_handler,
        crate::todo::api::get_todo_handler,
        crate::todo::api::create_todo_handler,
        crate::todo::api::update_todo_handler,
        crate::todo::api::delete_todo_handler,
    ),
    tags((name = "Todos", description = "Todo item management endpoints"))
)]
struct ApiDoc;

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let storage_config = StorageConfig::from_database_url(config.database_url.as_deref());
    let repository = storage::connect(&storage_config).await?;
    let app = create_app(repository, &config);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Assembles the application router over the given repository.
pub fn create_app(repository: Arc<dyn TodoRepository>, config: &Config) -> Router {
    let todo_state = Arc::new(TodoState { repository });

    let api_router = Router::new().nest("/api", create_todo_router(todo_state.clone()));
    let health_router = Router::new()
        .route("/health", axum::routing::get(health_check_handler))
        .with_state(todo_state);

    Router::new()
        .merge(api_router)
        .merge(health_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(config)),
        )
}

/// Builds the CORS layer from the configured comma-separated origin list.
///
/// With no configured origins the layer stays closed and no cross-origin
/// access is granted.
fn cors_layer(config: &Config) -> CorsLayer {
    let Some(raw_origins) = config.cors_origins.as_deref() else {
        return CorsLayer::new();
    };
    let mut origins: Vec<HeaderValue> = Vec::new();
    for origin in raw_origins.split(',') {
        match origin.trim().parse::<HeaderValue>() {
            Ok(value) => origins.push(value),
            Err(_) => tracing::warn!("Ignoring malformed CORS origin '{}'", origin.trim()),
        }
    }
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Reports whether the service and its storage backend are able to serve.
#[tracing::instrument(skip(state))]
pub async fn health_check_handler(
    State(state): State<Arc<TodoState>>,
) -> Result<&'static str, StatusCode> {
    match state.repository.ping().await {
        Ok(()) => Ok("OK"),
        Err(err) => {
            tracing::error!("Health check failed to reach storage: {}", err);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
