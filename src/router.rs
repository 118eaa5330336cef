use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::modules::auth::router::{init_auth_router, init_token_router};
use crate::modules::users::router::init_users_router;
use crate::state::AppState;

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// Builds the application router.
///
/// Credential endpoints (`/api/auth/*`, `/api/token*`) are rate limited per
/// client IP when enabled. Serving with the limiter on requires
/// `into_make_service_with_connect_info::<SocketAddr>()` unless every request
/// carries a forwarding header.
pub fn init_router(state: AppState) -> Router {
    let mut credential_routes = Router::new()
        .nest("/auth", init_auth_router())
        .merge(init_token_router());

    if state.rate_limit_config.enabled {
        credential_routes = credential_routes.layer(GovernorLayer::new(
            state.rate_limit_config.auth_governor_config(),
        ));
    }

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .merge(credential_routes)
                .merge(init_users_router()),
        )
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(logging_middleware))
}
