//! Application state wiring the infrastructure together.
//!
//! `AppState` owns the database pool, the loaded configuration (through the
//! injected TTL cache), and the session staging directory. Command handlers
//! construct repositories and stores from it on demand.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use leadflow_core::cache::TtlCache;
use leadflow_core::session::SessionStore;
use leadflow_infra::config::load_global_config_cached;
use leadflow_infra::filesystem::{resolve_data_dir, StagingDir};
use leadflow_infra::sqlite::client::SqliteClientRepository;
use leadflow_infra::sqlite::pool::DatabasePool;
use leadflow_infra::sqlite::session::SqliteSessionRepository;
use leadflow_types::config::GlobalConfig;

/// How long a loaded config stays cached before re-reading the file.
const CONFIG_TTL: Duration = Duration::from_secs(300);

/// Shared application state for CLI commands.
pub struct AppState {
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
    pub config: GlobalConfig,
    pub config_cache: Arc<TtlCache<GlobalConfig>>,
    staging: StagingDir,
}

impl AppState {
    /// Initialize the application state: resolve the data directory,
    /// connect to the database (running migrations), load configuration.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("leadflow.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        let config_cache = Arc::new(TtlCache::new(CONFIG_TTL));
        let config = load_global_config_cached(&data_dir, &config_cache).await;

        let staging = StagingDir::at(&data_dir)?;

        Ok(Self {
            data_dir,
            db_pool,
            config,
            config_cache,
            staging,
        })
    }

    /// Client repository over the shared pool.
    pub fn client_repository(&self) -> SqliteClientRepository {
        SqliteClientRepository::new(self.db_pool.clone())
    }

    /// Session store with the data-dir staging area.
    pub fn session_store(&self) -> SessionStore<SqliteSessionRepository> {
        SessionStore::new(
            SqliteSessionRepository::new(self.db_pool.clone()),
            self.staging.path().to_path_buf(),
        )
    }
}
