use std::net::SocketAddr;

use dotenvy::dotenv;
use lousa::logging::init_tracing;
use lousa::router::init_router;
use lousa::state::init_app_state;
use tracing::info;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    let state = init_app_state().await;
    let app = init_router(state);

    let addr = std::env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");

    info!(addr = %addr, "Server running");
    info!("Swagger UI available at /swagger-ui, Scalar at /scalar");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}
