//! Global configuration loader.
//!
//! Reads `config.toml` from the data directory (`~/.leadflow/` in
//! production) and deserializes it into [`GlobalConfig`]. Falls back to
//! defaults when the file is missing or malformed. Loaded values are held
//! in an injected TTL cache so repeated pipeline lookups skip the disk.

use std::path::Path;

use leadflow_core::cache::TtlCache;
use leadflow_types::config::GlobalConfig;

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - Missing file: returns [`GlobalConfig::default()`].
/// - Unreadable or unparseable file: logs a warning and returns the default.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Load global configuration through the injected TTL cache.
///
/// The cache key is the config file path, so one cache instance can serve
/// several data directories (tests do this).
pub async fn load_global_config_cached(
    data_dir: &Path,
    cache: &TtlCache<GlobalConfig>,
) -> GlobalConfig {
    let key = cache_key(data_dir);
    if let Some(config) = cache.get(&key) {
        return config;
    }

    let config = load_global_config(data_dir).await;
    cache.set(key, config.clone());
    config
}

/// Drop cached config for one data directory (e.g. after an edit).
pub fn invalidate_config(data_dir: &Path, cache: &TtlCache<GlobalConfig>) {
    cache.invalidate_prefix(&cache_key(data_dir));
}

fn cache_key(data_dir: &Path) -> String {
    format!("config:{}", data_dir.join("config.toml").display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_global_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_global_config(tmp.path()).await;
        assert!(!config.classifier.prefer_llm);
        assert_eq!(config.session.snapshot_interval_secs, 3_600);
    }

    #[tokio::test]
    async fn load_global_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[classifier]
prefer_llm = true
model = "claude-sonnet-4-20250514"

[session]
snapshot_interval_secs = 600
"#,
        )
        .await
        .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert!(config.classifier.prefer_llm);
        assert_eq!(config.classifier.model, "claude-sonnet-4-20250514");
        assert_eq!(config.session.snapshot_interval_secs, 600);
    }

    #[tokio::test]
    async fn load_global_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert!(!config.classifier.prefer_llm);
    }

    #[tokio::test]
    async fn cached_load_skips_disk_until_invalidated() {
        let tmp = TempDir::new().unwrap();
        let cache = TtlCache::new(Duration::from_secs(60));
        tokio::fs::write(tmp.path().join("config.toml"), "[classifier]\nprefer_llm = true\n")
            .await
            .unwrap();

        let first = load_global_config_cached(tmp.path(), &cache).await;
        assert!(first.classifier.prefer_llm);

        // The file changes, but the cached value is still served.
        tokio::fs::write(tmp.path().join("config.toml"), "[classifier]\nprefer_llm = false\n")
            .await
            .unwrap();
        let second = load_global_config_cached(tmp.path(), &cache).await;
        assert!(second.classifier.prefer_llm);

        // Invalidation forces a reload.
        invalidate_config(tmp.path(), &cache);
        let third = load_global_config_cached(tmp.path(), &cache).await;
        assert!(!third.classifier.prefer_llm);
    }
}
