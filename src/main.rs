use std::{process, sync::Arc};

use mediateca::{
    application::{contents::ContentService, error::AppError, store::ContentStore},
    cache::{CacheConfig, CachedStore},
    config,
    infra::{
        db::{MemoryStore, PostgresStore},
        error::InfraError,
        http::{ApiState, build_api_router},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(config::ServeArgs::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let (backend, db) = init_backend(&settings).await?;

    let cache_config = CacheConfig::from(&settings.cache);
    let store: Arc<dyn ContentStore> = if cache_config.enabled {
        Arc::new(CachedStore::new(backend, cache_config))
    } else {
        backend
    };

    let contents = Arc::new(ContentService::new(store));
    let router = build_api_router(ApiState { contents, db });

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "mediateca::serve",
        addr = %settings.server.addr,
        cache = settings.cache.enabled,
        "Listening"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresStore::connect(url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresStore::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    info!(target = "mediateca::migrate", "Migrations applied");
    Ok(())
}

async fn init_backend(
    settings: &config::Settings,
) -> Result<(Arc<dyn ContentStore>, Option<Arc<PostgresStore>>), AppError> {
    match settings.database.url.as_ref() {
        Some(url) => {
            let pool = PostgresStore::connect(url, settings.database.max_connections.get())
                .await
                .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

            PostgresStore::run_migrations(&pool)
                .await
                .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

            let store = Arc::new(PostgresStore::new(pool));
            let backend: Arc<dyn ContentStore> = store.clone();
            Ok((backend, Some(store)))
        }
        None => {
            warn!(
                target = "mediateca::serve",
                "No database url configured; records will not survive a restart"
            );
            Ok((Arc::new(MemoryStore::new()), None))
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to install shutdown signal handler");
    }
}
