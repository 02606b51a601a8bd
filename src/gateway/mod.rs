pub mod error;
pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::jwt_auth_middleware;
use state::AppState;

/// Build the full router: public routes, bearer-protected routes, Swagger UI
pub fn create_router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/api/v1/login", post(handlers::login))
        .route("/api/v1/vehicles", get(handlers::search_vehicles))
        .route("/api/v1/vehicles/{plate}", get(handlers::get_vehicle))
        .route("/api/v1/users", post(handlers::create_user))
        .route(
            "/api/v1/users/{national_id}",
            get(handlers::get_user_contact),
        )
        .route("/api/v1/publications", get(handlers::list_publications))
        .route("/api/v1/publications/{id}", get(handlers::get_publication));

    let protected_routes = Router::new()
        .route("/api/v1/vehicles", post(handlers::create_vehicle))
        .route(
            "/api/v1/vehicles/{plate}",
            axum::routing::put(handlers::update_vehicle).delete(handlers::delete_vehicle),
        )
        .route(
            "/api/v1/profile/{national_id}",
            get(handlers::get_user_profile),
        )
        .route(
            "/api/v1/users/{national_id}",
            axum::routing::put(handlers::update_user).delete(handlers::delete_user),
        )
        .route("/api/v1/publications", post(handlers::create_publication))
        .route(
            "/api/v1/publications/{id}",
            axum::routing::put(handlers::update_publication).delete(handlers::delete_publication),
        )
        .route(
            "/api/v1/favorites",
            post(handlers::add_favorite).delete(handlers::remove_favorite),
        )
        .route(
            "/api/v1/favorites/{national_id}",
            get(handlers::list_favorites),
        )
        .route("/api/v1/images", post(handlers::upload_images))
        .route("/api/v1/images/delete", post(handlers::delete_images))
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(public_routes)
        .merge(protected_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start HTTP Gateway server
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("[GATEWAY] Listening on http://{}", addr);
    tracing::info!("[GATEWAY] Swagger UI at http://{}/docs", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
