use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mailalert_events::{
    DisabledTransport, EmailConfig, MailTransport, SmtpMailer, TraceBus, TracePersistence,
};
use mailalert_pipeline::{AlertOrchestrator, AlertStore, PgAlertStore, PipelineConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mailalert_api::config::ServerConfig;
use mailalert_api::router::build_app_router;
use mailalert_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "mailalert_api=debug,mailalert_pipeline=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let pipeline_config = PipelineConfig::from_env().expect("Invalid pipeline configuration");
    let templates = pipeline_config
        .load_templates()
        .expect("Failed to load notification templates");
    tracing::info!(
        fault_policy = %pipeline_config.fault_policy,
        template_dir = ?pipeline_config.template_dir,
        "Loaded pipeline configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = mailalert_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    mailalert_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    mailalert_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Mail transport ---
    let transport: Arc<dyn MailTransport> = match EmailConfig::from_env() {
        Some(email_config) => {
            let mailer = SmtpMailer::new(&email_config).expect("Invalid SMTP configuration");
            tracing::info!(
                smtp_host = %email_config.smtp_host,
                smtp_port = email_config.smtp_port,
                "SMTP delivery configured"
            );
            Arc::new(mailer)
        }
        None => {
            tracing::warn!("SMTP_HOST not set, alerts will end SEND_FAILED");
            Arc::new(DisabledTransport)
        }
    };

    // --- Trace bus ---
    let trace_bus = Arc::new(TraceBus::default());
    let persistence_handle = tokio::spawn(TracePersistence::run(
        pool.clone(),
        trace_bus.subscribe(),
    ));
    tracing::info!("Trace persistence started");

    // --- Pipeline ---
    let store: Arc<dyn AlertStore> = Arc::new(PgAlertStore::new(pool.clone()));
    let orchestrator = Arc::new(AlertOrchestrator::new(
        Arc::clone(&store),
        transport,
        Arc::clone(&trace_bus),
        &pipeline_config,
        templates,
    ));

    // --- App state ---
    let state = AppState {
        pool,
        orchestrator,
        store,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // The orchestrator held the other handles; dropping the last one closes
    // the broadcast channel and stops persistence.
    drop(trace_bus);
    let _ = tokio::time::timeout(Duration::from_secs(5), persistence_handle).await;
    tracing::info!("Trace persistence shut down");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
