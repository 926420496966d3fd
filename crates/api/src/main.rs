use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tasklane_api::config::ServerConfig;
use tasklane_api::{routes, seed, state};
use tasklane_events::{EventBus, HistoryRecorder, Notifier};

use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasklane_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // Database is optional. Without DATABASE_URL the server still comes up;
    // data endpoints answer 503 and /health reports "degraded".
    let db = match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = tasklane_db::create_pool(&database_url)
                .await
                .expect("Failed to connect to database");

            tasklane_db::health_check(&pool)
                .await
                .expect("Database health check failed");

            tasklane_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database ready (pool, health check, migrations)");

            if config.seed_default_users {
                seed::seed_default_users(&pool)
                    .await
                    .expect("Failed to seed default users");
            }

            Some(pool)
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set, running in degraded mode without a database");
            None
        }
    };

    let cors = build_cors_layer(&config);

    // Event consumers only run with a database to write to.
    let event_bus = EventBus::default();
    let mut consumer_handles = Vec::new();
    if let Some(pool) = &db {
        // History recorder writes audit rows for every task event.
        consumer_handles.push(tokio::spawn(HistoryRecorder::run(
            pool.clone(),
            event_bus.subscribe(),
        )));
        // Notifier fans task events out into per-user notifications.
        consumer_handles.push(tokio::spawn(Notifier::run(
            pool.clone(),
            event_bus.subscribe(),
        )));
        tracing::info!("Event consumers started (history recorder, notifier)");
    }

    let state = AppState {
        db,
        config: Arc::new(config.clone()),
        event_bus: event_bus.clone(),
    };

    let request_id_header = HeaderName::from_static("x-request-id");

    // Layers run top-to-bottom on the way in, so the panic catcher and
    // timeout sit outermost and the request id is assigned before tracing
    // opens its span.
    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state);

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

    tracing::info!("Server stopped accepting connections, draining consumers");

    // Dropping the last sender closes the broadcast channel; the consumers
    // see Closed and exit once their queues are empty.
    drop(event_bus);
    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    for handle in consumer_handles {
        let _ = tokio::time::timeout(drain, handle).await;
    }

    tracing::info!("Graceful shutdown complete");
}

/// Resolve when the process is told to stop: SIGINT (Ctrl-C) or, on Unix,
/// SIGTERM from a process manager.
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
            tracing::info!("Received SIGINT, shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}

/// Build the CORS layer.
///
/// A configured origin list is mirrored back with credentials allowed.
/// The single origin `*` opens the API to any origin, without credentials,
/// which the wildcard forbids. An unparseable origin panics at startup.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    if config.cors_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    layer
        .allow_origin(origins)
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
