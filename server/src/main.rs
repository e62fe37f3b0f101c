// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Server entry point: loads configuration, selects the storage backend,
//! wires the gateways and domain service, and serves the HTTP API.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use students_core::application::student_service::StandardStudentService;
use students_core::config::ServiceConfig;
use students_core::domain::repository::{StorageBackend, StudentRepository};
use students_core::infrastructure::db::Database;
use students_core::infrastructure::gateways::{HttpPaymentsGateway, HttpTrainingsGateway};
use students_core::infrastructure::repositories::{
    InMemoryStudentRepository, PostgresStudentRepository,
};
use students_core::presentation::api;

#[derive(Parser)]
#[command(name = "students-server", about = "Student records microservice")]
struct Args {
    /// Path to a YAML config file; defaults plus env vars apply without one.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen address from config.
    #[arg(long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = ServiceConfig::load(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }

    let repository: Arc<dyn StudentRepository> = match config.storage_backend()? {
        StorageBackend::InMemory => {
            info!("using in-memory storage backend");
            Arc::new(InMemoryStudentRepository::new())
        }
        StorageBackend::Postgres(pg) => {
            info!("connecting to postgres");
            let db = Database::connect(&pg.connection_string).await?;
            db.migrate().await?;
            Arc::new(PostgresStudentRepository::new(db.pool().clone()))
        }
    };

    let payments = Arc::new(HttpPaymentsGateway::new(
        config.payments_service.base_url.clone(),
        config.payments_service.timeout(),
    )?);
    let trainings = Arc::new(HttpTrainingsGateway::new(
        config.trainings_service.base_url.clone(),
        config.trainings_service.timeout(),
    )?);

    let service = Arc::new(StandardStudentService::new(repository, payments, trainings));
    let app = api::app(service).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!(addr = %config.listen_addr, "students service listening");
    axum::serve(listener, app).await?;

    Ok(())
}
