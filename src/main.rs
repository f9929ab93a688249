use axum::extract::DefaultBodyLimit;
use employment_platform::{
    config::{get_config, init_config},
    database::pool::{create_pool, run_migrations},
    middleware::cors::api_cors,
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    run_migrations(&pool).await?;

    let app_state = AppState::new(pool);

    if let Some(admin) = &config.bootstrap_admin {
        let user = app_state
            .user_service
            .create_superuser(&admin.phone, &admin.password)
            .await?;
        info!(user_id = user.id, phone = %user.phone, "bootstrap administrator ready");
    }

    tokio::fs::create_dir_all(&config.uploads_dir).await?;
    info!("Serving uploads from: {}", config.uploads_dir);

    let app = routes::api_router(app_state)
        .nest_service("/uploads", ServeDir::new(&config.uploads_dir))
        .layer(api_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(12 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
