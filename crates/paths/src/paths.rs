//! Path context for runtime environment detection and server-aware paths.
//!
//! Layout below the base path:
//!
//! ```text
//! <base>/<server_id>/
//!     logs/<app_id>.<timestamp>.log
//!     plugins/<plugin>/...
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Identifies the runtime environment where the server is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuntimeEnvironment {
    /// Running via `cargo run` or in development mode
    Development,
    /// Running as an installed binary in production
    Production,
}

/// Context for managing server paths based on a server/app structure.
#[derive(Debug, Clone)]
pub struct PathContext {
    /// Base path for all server data
    base_path: Arc<Path>,
    /// Server identifier (e.g., "survival")
    server_id: String,
    /// Application identifier (e.g., "void_server")
    app_id: &'static str,
}

impl PathContext {
    /// Creates a new PathContext with automatic environment detection.
    pub fn new(server_id: impl Into<String>, app_id: &'static str) -> Self {
        let environment = Self::detect_environment();
        let base_path = Self::determine_base_path(environment);

        Self {
            base_path: base_path.into(),
            server_id: server_id.into(),
            app_id,
        }
    }

    /// Creates a PathContext with an explicit base path (useful for testing).
    pub fn with_base_path(
        base_path: PathBuf,
        server_id: impl Into<String>,
        app_id: &'static str,
    ) -> Self {
        Self {
            base_path: base_path.into(),
            server_id: server_id.into(),
            app_id,
        }
    }

    fn detect_environment() -> RuntimeEnvironment {
        // target/debug or target/release means we were started by cargo
        if let Ok(exe_path) = std::env::current_exe() {
            if exe_path.components().any(|c| c.as_os_str() == "target") {
                return RuntimeEnvironment::Development;
            }
        }

        if std::env::var("CARGO").is_ok() || std::env::var("CARGO_MANIFEST_DIR").is_ok() {
            return RuntimeEnvironment::Development;
        }

        RuntimeEnvironment::Production
    }

    fn determine_base_path(environment: RuntimeEnvironment) -> PathBuf {
        match environment {
            RuntimeEnvironment::Development => {
                if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
                    PathBuf::from(manifest_dir)
                } else if let Ok(current_dir) = std::env::current_dir() {
                    current_dir
                } else {
                    PathBuf::from(".")
                }
            }
            RuntimeEnvironment::Production => dirs::data_local_dir()
                .map(|dir| dir.join("VoidRespawn"))
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    pub fn server_id(&self) -> &str {
        &self.server_id
    }

    pub fn app_id(&self) -> &str {
        self.app_id
    }

    /// Returns the server root path: `<base>/<server_id>`
    pub fn server_root(&self) -> PathBuf {
        self.base_path.join(&self.server_id)
    }

    /// Returns the plugins directory path: `<server_id>/plugins/`
    pub fn plugins_dir(&self) -> PathBuf {
        self.server_root().join("plugins")
    }

    /// Returns the data directory of one plugin: `<server_id>/plugins/<plugin>/`
    pub fn plugin_data_dir(&self, plugin: &str) -> PathBuf {
        self.plugins_dir().join(plugin)
    }

    /// Returns the logs directory path: `<server_id>/logs/`
    pub fn logs_dir(&self) -> PathBuf {
        self.server_root().join("logs")
    }

    /// Returns a log file path with timestamp: `<server_id>/logs/<app_id>.<timestamp>.log`
    pub fn log_file(&self, timestamp: &str) -> PathBuf {
        self.logs_dir()
            .join(format!("{}.{}.log", self.app_id, timestamp))
    }

    /// Returns a log file path with current timestamp.
    pub fn log_file_now(&self) -> PathBuf {
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
        self.log_file(&timestamp)
    }

    /// Ensures the server root, plugins and logs directories exist.
    ///
    /// Plugin data directories are created by the plugins themselves.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        for dir in [self.server_root(), self.plugins_dir(), self.logs_dir()] {
            if !dir.exists() {
                std::fs::create_dir_all(&dir)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_context_structure() {
        let ctx = PathContext::with_base_path(PathBuf::from("/test/base"), "survival", "void_server");

        assert_eq!(ctx.server_id(), "survival");
        assert_eq!(ctx.app_id(), "void_server");
        assert_eq!(ctx.server_root(), PathBuf::from("/test/base/survival"));
    }

    #[test]
    fn test_plugin_paths() {
        let ctx = PathContext::with_base_path(PathBuf::from("/base"), "server", "app");

        assert_eq!(ctx.plugins_dir(), PathBuf::from("/base/server/plugins"));
        assert_eq!(
            ctx.plugin_data_dir("VoidRespawn"),
            PathBuf::from("/base/server/plugins/VoidRespawn")
        );
    }

    #[test]
    fn test_log_file_path() {
        let ctx = PathContext::with_base_path(PathBuf::from("/base"), "server", "app");

        let log_path = ctx.log_file("20240315-120000");
        assert_eq!(
            log_path,
            PathBuf::from("/base/server/logs/app.20240315-120000.log")
        );
    }

    #[test]
    fn test_ensure_directories_creates_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = PathContext::with_base_path(tmp.path().to_path_buf(), "server", "app");

        ctx.ensure_directories().unwrap();

        assert!(ctx.plugins_dir().is_dir());
        assert!(ctx.logs_dir().is_dir());
    }
}
