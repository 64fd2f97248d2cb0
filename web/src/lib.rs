use axum::http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method};
use axum_login::{
    tower_sessions::{Expiry, SessionManagerLayer},
    AuthManagerLayerBuilder,
};
use domain::user::Backend;
use log::*;
use service::config::ApiVersion;
use tower_http::cors::CorsLayer;
use tower_sessions_sqlx_store::PostgresStore;

pub use error::{Error, Result};
pub use service::AppState;

pub(crate) mod controller;
pub(crate) mod error;
pub(crate) mod extractors;
pub(crate) mod middleware;
pub(crate) mod params;
pub(crate) mod router;

/// Brings up the HTTP server: session store, auth layer, CORS, router.
/// Blocks until the server shuts down.
pub async fn init_server(
    app_state: AppState,
) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Sessions live next to the application tables; the store manages its own table.
    let pool = app_state.db_conn_ref().get_postgres_connection_pool().clone();
    let session_store = PostgresStore::new(pool).with_schema_name("chronicler")?;
    session_store.migrate().await?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(app_state.config.is_production())
        .with_expiry(Expiry::OnInactivity(time::Duration::seconds(
            app_state.config.backend_session_expiry_seconds as i64,
        )));

    let backend = Backend::new(&app_state.database_connection);
    let auth_layer = AuthManagerLayerBuilder::new(backend, session_layer).build();

    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_credentials(true)
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_lowercase(ApiVersion::field_name().as_bytes())?,
        ])
        .allow_origin(
            app_state
                .config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        );

    let listen_address = format!(
        "{}:{}",
        app_state.config.interface.as_deref().unwrap_or("127.0.0.1"),
        app_state.config.port
    );

    let router = router::define_routes(app_state)
        .layer(cors_layer)
        .layer(auth_layer);

    info!("Server starting... listening on {listen_address}");

    let listener = tokio::net::TcpListener::bind(&listen_address).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
