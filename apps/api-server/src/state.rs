//! Application state - shared across all handlers.

use std::sync::Arc;

use chrono::TimeDelta;
use quill_core::ports::{
    CommentRepository, PasswordService, PostRepository, SessionStore, TagRepository,
    TokenService, UserRepository,
};
use quill_core::service::{AccountService, CommentService, PostService};
use quill_infra::{Argon2PasswordService, InMemorySessionStore, InMemoryStore, JwtTokenService};

#[cfg(feature = "postgres")]
use quill_infra::database::{
    DatabaseConnection, PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository,
    PostgresUserRepository,
};

use crate::config::AppConfig;

/// One object store, seen through each repository port.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            posts: store.clone(),
            tags: store.clone(),
            comments: store,
        }
    }

    #[cfg(feature = "postgres")]
    pub fn postgres(connection: &DatabaseConnection) -> Self {
        let db = &connection.conn;
        Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            tags: Arc::new(PostgresTagRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db.clone())),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub posts: Arc<PostService>,
    pub comments: Arc<CommentService>,
    pub landing_path: String,
}

impl AppState {
    /// Build the state from configuration, falling back to the in-memory
    /// store when no database is configured or reachable.
    pub async fn new(config: &AppConfig) -> Self {
        let repositories = Self::open_store(config).await;

        Self::assemble(
            config,
            repositories,
            Arc::new(JwtTokenService::from_env()),
            Arc::new(Argon2PasswordService::new()),
        )
    }

    #[cfg(feature = "postgres")]
    async fn open_store(config: &AppConfig) -> Repositories {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Repositories::in_memory();
        };

        match DatabaseConnection::init(db_config).await {
            Ok(connection) => Repositories::postgres(&connection),
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to database. Using in-memory fallback.");
                Repositories::in_memory()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn open_store(_config: &AppConfig) -> Repositories {
        tracing::info!("Running without postgres feature - using in-memory store");
        Repositories::in_memory()
    }

    /// Wire services over the given store and auth implementations.
    pub fn assemble(
        config: &AppConfig,
        repositories: Repositories,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(
            TimeDelta::hours(config.session_ttl_hours),
        ));

        let Repositories {
            users,
            posts,
            tags,
            comments,
        } = repositories;

        tracing::info!(page_size = config.page_size, "Application state initialized");

        Self {
            accounts: Arc::new(AccountService::new(users, sessions, tokens, passwords)),
            posts: Arc::new(PostService::new(
                posts.clone(),
                tags,
                comments.clone(),
                config.page_size,
            )),
            comments: Arc::new(CommentService::new(posts, comments)),
            landing_path: config.landing_path.clone(),
        }
    }
}
