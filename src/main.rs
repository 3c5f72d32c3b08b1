use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod payroll;
mod routes;
mod seed;

use config::Config;
use db::init_db;

use crate::docs::ApiDoc;
use crate::seed::SeedArgs;
use tracing::{Level, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[derive(Parser)]
#[command(name = "hr-payroll", about = "HR + payroll portal backend", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP service (default command)
    Serve,
    /// Replace employees and attendance with the contents of two JSON documents
    Seed(SeedArgs),
}

enum LogTarget {
    /// Rolling daily file under `logs/`
    File,
    Stdout,
}

fn init_tracing(level: Level, target: LogTarget) -> WorkerGuard {
    let (non_blocking, guard) = match target {
        LogTarget::File => tracing_appender::non_blocking(rolling::daily("logs", "app.log")),
        LogTarget::Stdout => tracing_appender::non_blocking(std::io::stdout()),
    };

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    guard
}

#[get("/")]
async fn index() -> impl Responder {
    "HR + Payroll API"
}

async fn serve(config: Config) -> anyhow::Result<()> {
    info!(addr = %config.server_addr, reference_day = %config.reference_day, "Server starting...");

    let pool = init_db(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(config.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(&server_addr)
    .with_context(|| format!("failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    match Cli::parse().command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let config = Config::from_env()?;
            let _guard = init_tracing(config.log_level, LogTarget::File);
            serve(config).await
        }
        Command::Seed(args) => {
            let _guard = init_tracing(Level::INFO, LogTarget::Stdout);
            seed::run(args).await
        }
    }
}
