use clap::Parser;
use dotenv::dotenv;
use sea_orm::{ConnectOptions, Database};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use stackfolio::config::ServerConfig;
use stackfolio::db::schema;
use stackfolio::db::services::work_location_service;
use stackfolio::web::create_axum_router;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind, overriding LISTEN_ADDR
    #[arg(short, long)]
    listen: Option<String>,
}

fn init_logging() {
    let file_appender = rolling::daily("logs", "server.log");
    let file_layer = fmt::layer().with_writer(file_appender).with_ansi(false);

    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sea_orm=warn,sqlx::query=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    init_logging();
    dotenv().ok();

    let config = Arc::new(ServerConfig::from_env()?);

    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(10).sqlx_logging(false);
    let db = Database::connect(opt).await?;

    schema::create_all_tables(&db).await?;
    work_location_service::seed_defaults(&db).await?;

    let listen_addr = args.listen.unwrap_or_else(|| config.listen_addr.clone());
    let addr: SocketAddr = listen_addr.parse()?;

    let app = create_axum_router(db, config);

    info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
