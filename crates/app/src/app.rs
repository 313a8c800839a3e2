//! Start-up shared by the workspace binaries: resolve the project paths,
//! create the directory tree and install the tracing subscriber.
//!
//! ```ignore
//! struct EmploymentFormApp;
//! impl app::Application for EmploymentFormApp {
//!     const APP_ID: &'static str = "employment_form";
//! }
//!
//! let ctx = AppBuilder::<EmploymentFormApp>::new(env!("CARGO_PKG_VERSION"))?.build();
//! let settings = ctx.path_context().settings_file();
//! ```

use std::marker::PhantomData;
use std::path::Path;

use paths::PathContext;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Identity of a binary. Organisation and project decide the shared project root.
pub trait Application: Sized + 'static {
    const APP_ID: &'static str;
    const ORGANISATION: &'static str = "people_ops";
    const PROJECT_ID: &'static str = "recruitment";
}

pub struct AppContext {
    path_context: PathContext,
    version: &'static str,
    // flushes the non-blocking file writer on drop
    _log_guard: WorkerGuard,
}

impl AppContext {
    pub fn app_id(&self) -> &'static str {
        self.path_context.app_id()
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn path_context(&self) -> &PathContext {
        &self.path_context
    }
}

pub struct AppBuilder<A: Application> {
    context: AppContext,
    _marker: PhantomData<A>,
}

impl<A: Application> AppBuilder<A> {
    /// Debug builds keep everything under `<workspace>/.out`, release builds
    /// use the platform data directory.
    pub fn new(version: &'static str) -> Result<Self, BoxError> {
        let path_context = if cfg!(debug_assertions) {
            let out = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../.out");
            PathContext::with_base_path(out, A::ORGANISATION, A::PROJECT_ID, A::APP_ID)
        } else {
            PathContext::new(A::ORGANISATION, A::PROJECT_ID, A::APP_ID)
        };
        path_context.ensure_directories()?;

        let log_guard = init_logging(&path_context)?;
        tracing::info!(
            app = A::APP_ID,
            version,
            root = %path_context.project_root().display(),
            "application context ready"
        );

        Ok(Self {
            context: AppContext {
                path_context,
                version,
                _log_guard: log_guard,
            },
            _marker: PhantomData,
        })
    }

    pub fn build(self) -> AppContext {
        self.context
    }
}

/// File layer (one file per run, no ANSI) plus a stderr layer.
/// Default level INFO in debug builds and WARN in release; `RUST_LOG` overrides.
fn init_logging(path_context: &PathContext) -> Result<WorkerGuard, BoxError> {
    let log_file = path_context.log_file_now();
    let (Some(dir), Some(name)) = (log_file.parent(), log_file.file_name()) else {
        return Err(format!("invalid log file path {}", log_file.display()).into());
    };
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));

    let level = if cfg!(debug_assertions) {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    };
    let filter = || {
        EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy()
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter()),
        )
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(filter()),
        )
        .try_init()?;

    Ok(guard)
}
