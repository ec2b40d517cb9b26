use paths::PathContext;
use std::marker::PhantomData;
use std::path::PathBuf;
use tracing_subscriber::{
    Layer, filter::LevelFilter, filter::filter_fn, fmt, layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Server infrastructure context.
///
/// Contains path management, version info, and logging infrastructure.
/// Every host process needs this, whether it runs a Bevy app or not.
pub struct AppContext {
    pub path_context: PathContext,
    pub version: &'static str,
    /// The log guard must be kept alive for the duration of the process
    /// to ensure log messages are properly flushed.
    _log_guard: tracing_appender::non_blocking::WorkerGuard,
}

impl AppContext {
    pub fn app_id(&self) -> &str {
        self.path_context.app_id()
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn path_context(&self) -> &PathContext {
        &self.path_context
    }

    /// Data directory handed to a plugin on registration.
    pub fn plugin_data_dir(&self, plugin: &str) -> PathBuf {
        self.path_context.plugin_data_dir(plugin)
    }
}

/// Application metadata trait.
///
/// Define the host's identity by implementing this trait.
pub trait Application: Sized + 'static {
    const APP_ID: &'static str;
    const SERVER_ID: &'static str = "server";
}

/// Builder for creating host processes with proper initialization.
pub struct AppBuilder<A: Application> {
    context: AppContext,
    _marker: PhantomData<A>,
}

impl<A: Application> AppBuilder<A> {
    /// Create a new builder with the platform default base path.
    ///
    /// This performs all the common initialization:
    /// - Sets up path context
    /// - Ensures all directories exist
    /// - Initializes logging (file + console)
    pub fn new(version: &'static str) -> Result<Self, BoxError> {
        #[cfg(debug_assertions)]
        let path_context = PathContext::with_base_path(
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("..")
                .join("..")
                .join(".out"),
            A::SERVER_ID,
            A::APP_ID,
        );
        #[cfg(not(debug_assertions))]
        let path_context = PathContext::new(A::SERVER_ID, A::APP_ID);

        Self::with_path_context(version, path_context)
    }

    /// Create a new builder rooted at an explicit directory.
    pub fn with_base_path(version: &'static str, base_path: PathBuf) -> Result<Self, BoxError> {
        let path_context = PathContext::with_base_path(base_path, A::SERVER_ID, A::APP_ID);
        Self::with_path_context(version, path_context)
    }

    fn with_path_context(
        version: &'static str,
        path_context: PathContext,
    ) -> Result<Self, BoxError> {
        path_context.ensure_directories()?;

        let log_file_path = path_context.log_file_now();
        let log_dir = log_file_path
            .parent()
            .ok_or("log file path has no parent directory")?;
        let log_filename = log_file_path
            .file_name()
            .ok_or("log file path has no file name")?;

        let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        #[cfg(debug_assertions)]
        let level = LevelFilter::INFO;

        #[cfg(not(debug_assertions))]
        let level = LevelFilter::WARN;

        let file_layer = fmt::Layer::default()
            .with_target(false)
            .with_ansi(false)
            .with_writer(non_blocking)
            .with_filter(filter_fn(move |metadata| metadata.level() <= &level));

        let console_layer = fmt::Layer::default()
            .with_target(false)
            .with_filter(filter_fn(move |metadata| metadata.level() <= &level));

        // A subscriber may already be installed (tests, embedding hosts).
        let _ = tracing_subscriber::registry()
            .with(file_layer)
            .with(console_layer)
            .try_init();

        Ok(Self {
            context: AppContext {
                path_context,
                version,
                _log_guard: guard,
            },
            _marker: PhantomData,
        })
    }

    /// Build a host without Bevy.
    pub fn build_simple(self) -> AppContext {
        self.context
    }

    /// Build a Bevy-based host.
    ///
    /// The `configure` callback receives the Bevy `App` by value and the `AppContext`,
    /// and must return the configured App.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let app = AppBuilder::<MyServer>::new("1.0.0")?
    ///     .build_with_bevy(|mut app, ctx| {
    ///         app.add_plugins(VoidRespawnPlugin::new(ctx.plugin_data_dir("VoidRespawn")));
    ///         app
    ///     });
    /// ```
    #[cfg(feature = "bevy")]
    pub fn build_with_bevy(
        self,
        configure: impl FnOnce(bevy::prelude::App, &AppContext) -> bevy::prelude::App,
    ) -> BevyApp<A> {
        let bevy_app = bevy::prelude::App::new();
        let configured_app = configure(bevy_app, &self.context);

        BevyApp {
            context: self.context,
            app: configured_app,
            _marker: PhantomData,
        }
    }
}

/// Bevy-based host wrapper.
///
/// The context is kept alive to ensure logging continues working.
#[cfg(feature = "bevy")]
pub struct BevyApp<A: Application> {
    pub context: AppContext,
    pub app: bevy::prelude::App,
    _marker: PhantomData<A>,
}

#[cfg(feature = "bevy")]
impl<A: Application> BevyApp<A> {
    /// Run the Bevy application until it exits.
    pub fn run(&mut self) -> bevy::app::AppExit {
        self.app.run()
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestServer;

    impl Application for TestServer {
        const APP_ID: &'static str = "test_server";
    }

    #[test]
    fn builder_creates_layout_and_log_file() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = AppBuilder::<TestServer>::with_base_path("0.0.1", tmp.path().to_path_buf())
            .unwrap()
            .build_simple();

        assert_eq!(ctx.app_id(), "test_server");
        assert_eq!(ctx.version(), "0.0.1");
        assert!(ctx.path_context().logs_dir().is_dir());
        assert_eq!(
            ctx.plugin_data_dir("VoidRespawn"),
            tmp.path().join("server").join("plugins").join("VoidRespawn")
        );
    }
}
