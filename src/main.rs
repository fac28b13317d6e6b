//! EventHub Server
//!
//! Event listing and registration platform:
//! - Public event catalogue with per-event detail pages
//! - Guest and member registration with capacity enforcement
//! - Organiser dashboards and event management
//! - Admin moderation, analytics, and CSV export

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use eventhub::api::{self, AppState};
use eventhub::repository::memory::{
    InMemoryEventRepository, InMemoryRegistrationRepository, InMemorySessionRepository,
    InMemoryUserRepository,
};
use eventhub::repository::mongo::{
    ensure_indexes, MongoEventRepository, MongoRegistrationRepository, MongoSessionRepository,
    MongoUserRepository,
};
use eventhub::repository::{
    EventRepository, RegistrationRepository, SessionRepository, UserRepository,
};
use eventhub::service::{
    AdminService, AuthService, EventService, FsImageStore, ImageStore, NoopImageStore,
    RegistrationService,
};

/// EventHub Server
#[derive(Parser, Debug)]
#[command(name = "eventhub")]
#[command(about = "Event listing and registration platform")]
struct Args {
    /// HTTP listen port
    #[arg(long, env = "EVENTHUB_PORT", default_value = "8080")]
    port: u16,

    /// Storage backend: memory, mongo
    #[arg(long, env = "EVENTHUB_STORAGE", default_value = "memory")]
    storage: String,

    /// MongoDB connection URL (when using mongo storage)
    #[arg(
        long,
        env = "EVENTHUB_MONGO_URL",
        default_value = "mongodb://localhost:27017"
    )]
    mongo_url: String,

    /// MongoDB database name
    #[arg(long, env = "EVENTHUB_MONGO_DB", default_value = "eventhub")]
    mongo_db: String,

    /// Directory holding uploaded event images; unset disables cleanup
    #[arg(long, env = "EVENTHUB_UPLOAD_DIR")]
    upload_dir: Option<String>,
}

struct Repositories {
    users: Arc<dyn UserRepository>,
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    sessions: Arc<dyn SessionRepository>,
}

async fn build_repositories(args: &Args) -> Result<Repositories> {
    match args.storage.as_str() {
        "mongo" => {
            info!("Connecting to MongoDB at {}", args.mongo_url);
            let client = mongodb::Client::with_uri_str(&args.mongo_url).await?;
            let db = client.database(&args.mongo_db);
            ensure_indexes(&db).await?;
            Ok(Repositories {
                users: Arc::new(MongoUserRepository::new(&db)),
                events: Arc::new(MongoEventRepository::new(&db)),
                registrations: Arc::new(MongoRegistrationRepository::new(&db)),
                sessions: Arc::new(MongoSessionRepository::new(&db)),
            })
        }
        "memory" => Ok(Repositories {
            users: Arc::new(InMemoryUserRepository::new()),
            events: Arc::new(InMemoryEventRepository::new()),
            registrations: Arc::new(InMemoryRegistrationRepository::new()),
            sessions: Arc::new(InMemorySessionRepository::new()),
        }),
        other => anyhow::bail!("unknown storage backend: {other} (expected memory or mongo)"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let args = Args::parse();

    info!("Starting EventHub server");
    info!("Port: {}, storage: {}", args.port, args.storage);

    let repos = build_repositories(&args).await?;

    let images: Arc<dyn ImageStore> = match &args.upload_dir {
        Some(dir) => Arc::new(FsImageStore::new(dir)),
        None => Arc::new(NoopImageStore),
    };

    let auth = Arc::new(AuthService::new(repos.users.clone(), repos.sessions.clone()));
    let events = Arc::new(EventService::new(
        repos.events.clone(),
        repos.registrations.clone(),
        images,
    ));
    let registrations = Arc::new(RegistrationService::new(
        repos.events.clone(),
        repos.registrations.clone(),
    ));
    let admin = Arc::new(AdminService::new(
        repos.users.clone(),
        repos.events.clone(),
        repos.registrations.clone(),
    ));

    let state = AppState {
        auth,
        events,
        registrations,
        admin,
    };

    let app = api::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let listener = TcpListener::bind(format!("0.0.0.0:{}", args.port)).await?;
    info!("Listening on {}", listener.local_addr()?);
    info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
