/// Application state and router builder
///
/// Services are constructed once from a store and the configuration, then
/// shared with every handler through axum's `State` extractor.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use plando_api::{app::{build_router, AppState}, config::Config};
/// use plando_shared::store::memory::MemoryStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(MemoryStore::new()), config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{auth, deadline, ownership, security::SecurityHeadersLayer},
    routes,
};
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post},
    Router,
};
use plando_shared::{
    auth::{credentials::CredentialService, jwt::TokenService, ownership::OwnershipChecker},
    services::{category::CategoryService, task::TaskService},
    store::Store,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Backend used by the health check
    pub store: Arc<dyn Store>,

    pub tokens: TokenService,

    pub credentials: CredentialService,

    pub ownership: OwnershipChecker,

    pub tasks: TaskService,

    pub categories: CategoryService,

    pub config: Arc<Config>,
}

impl AppState {
    /// Wires every service to the same store
    pub fn new<S: Store + 'static>(store: Arc<S>, config: Config) -> Self {
        let tokens = TokenService::new(config.jwt.secret.clone(), config.token_ttl());

        Self {
            credentials: CredentialService::new(store.clone(), tokens.clone()),
            ownership: OwnershipChecker::new(store.clone()),
            tasks: TaskService::new(store.clone()),
            categories: CategoryService::new(store.clone()),
            store,
            tokens,
            config: Arc::new(config),
        }
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET /health                      public
/// └── /api/v1/
///     ├── POST   /sign-up              public
///     ├── POST   /sign-in              public
///     ├── DELETE /user                 token
///     ├── POST   /task                 token + category ownership
///     ├── POST   /task/all             token
///     ├── GET    /task/:id             token + task ownership
///     ├── PATCH  /task/:id             token + task ownership + category ownership
///     ├── DELETE /task/:id             token + task ownership
///     ├── POST   /task/:id/readiness   token + task ownership
///     ├── POST   /category             token
///     ├── POST   /category/all         token
///     └── DELETE /category/:id         token (owner-scoped)
/// ```
///
/// Outer middleware, outermost first: security headers, CORS, tracing,
/// request deadline.
pub fn build_router(state: AppState) -> Router {
    let category_gate = from_fn_with_state(state.clone(), ownership::require_category_ownership);
    let task_gate = from_fn_with_state(state.clone(), ownership::require_task_ownership);

    let public_routes = Router::new()
        .route("/sign-up", post(routes::auth::sign_up))
        .route("/sign-in", post(routes::auth::sign_in));

    let task_routes = Router::new()
        .route(
            "/task/:id",
            get(routes::tasks::get_task)
                .delete(routes::tasks::delete_task)
                .merge(patch(routes::tasks::update_task).route_layer(category_gate.clone())),
        )
        .route("/task/:id/readiness", post(routes::tasks::toggle_readiness))
        .route_layer(task_gate);

    let protected_routes = Router::new()
        .route("/user", delete(routes::auth::delete_user))
        .route(
            "/task",
            post(routes::tasks::create_task).route_layer(category_gate),
        )
        .route("/task/all", post(routes::tasks::list_tasks))
        .route("/category", post(routes::categories::create_category))
        .route("/category/all", post(routes::categories::list_categories))
        .route("/category/:id", delete(routes::categories::delete_category))
        .merge(task_routes)
        .route_layer(from_fn_with_state(state.clone(), auth::require_auth));

    let v1_routes = Router::new().merge(public_routes).merge(protected_routes);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api/v1", v1_routes)
        .layer(from_fn_with_state(
            state.config.request_timeout(),
            deadline::enforce_deadline,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
