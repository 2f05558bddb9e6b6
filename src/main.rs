use actix_web::{App, HttpServer, middleware::Logger, web};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use noor_backoffice::{
  adapters::http::{
    ApiRouteDependencies, RequestIdMiddleware, configure_api_routes, health_handler,
  },
  application::editing::EditSessionRegistry,
  domain::sales::{EditingService, EditingServiceDependencies, StockPolicy},
  infrastructure::{
    config::Config,
    persistence::postgres::{
      PostgresInvoiceRepository, PostgresOrderItemRepository, PostgresOrderRepository,
      PostgresProductRepository, PostgresReconciliationStore,
    },
  },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "noor_backoffice=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting Noor Creations back office");

  let config = Config::load().map_err(|e| {
    tracing::error!("Failed to load configuration: {}", e);
    std::io::Error::new(
      std::io::ErrorKind::InvalidInput,
      format!("Invalid configuration: {}", e),
    )
  })?;
  tracing::info!("Configuration loaded successfully");

  tracing::info!(
    host = %config.server.host,
    port = config.server.port,
    max_connections = config.database.max_connections,
    "Connecting to database"
  );

  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Database connection timed out after {} seconds",
        config.database.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    match e {
      sqlx::Error::Io(_) => std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "Could not connect to database. Is PostgreSQL running?",
      ),
      _ => std::io::Error::other(format!("Database error: {}", e)),
    }
  })?;

  tracing::info!("Database connection pool created");

  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to run database migrations: {}", e);
      std::io::Error::other(format!("Migration error: {}", e))
    })?;
  tracing::info!("Database migrations completed");

  // Repositories
  let product_repo = Arc::new(PostgresProductRepository::new(
    db_pool.clone(),
    config.catalog.search_limit,
  ));
  let order_repo = Arc::new(PostgresOrderRepository::new(db_pool.clone()));
  let invoice_repo = Arc::new(PostgresInvoiceRepository::new(db_pool.clone()));
  let order_item_repo = Arc::new(PostgresOrderItemRepository::new(db_pool.clone()));
  let reconciliation_store = Arc::new(PostgresReconciliationStore::new(db_pool.clone()));

  let stock_policy = StockPolicy::from_allow_negative(config.inventory.allow_negative_stock);
  tracing::info!(?stock_policy, "Inventory policy");

  let editing_service = Arc::new(EditingService::new(EditingServiceDependencies {
    catalog: product_repo,
    order_repo,
    invoice_repo,
    order_item_repo,
    reconciliation_store,
    stock_policy,
  }));

  let registry = Arc::new(EditSessionRegistry::new(config.sessions.idle_ttl()));
  let _sweeper = registry.spawn_sweeper(config.sessions.sweep_interval());
  tracing::info!(
    idle_ttl_seconds = config.sessions.idle_ttl_seconds,
    "Edit session sweeper started"
  );

  let api_deps = ApiRouteDependencies::new(
    editing_service,
    registry,
    config.catalog.search_limit,
  );

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  HttpServer::new(move || {
    App::new()
      .wrap(RequestIdMiddleware::new())
      .wrap(Logger::default())
      .service(web::scope("/api/v1").configure(|cfg| configure_api_routes(cfg, api_deps.clone())))
      .route("/health", web::get().to(health_handler))
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await
}
