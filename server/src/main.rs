mod config;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // Optional .env; real environment variables take precedence.
    let _ = dotenvy::dotenv();

    let config = config::ServerConfig::from_env().expect("invalid server configuration");
    let state = state::AppState::new();

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(config.listen_addr())
        .await
        .expect("failed to bind");

    tracing::info!(addr = %config.listen_addr(), "chatroom listening");
    axum::serve(listener, app).await.expect("server failed");
}
