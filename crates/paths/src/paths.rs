//! Where the form application keeps its files.
//!
//! ```text
//! <base>/<organisation>/<project_id>/
//!   <app_id>.settings.ron        configuration deltas
//!   data/<app_id>.session.json   signed-in email flag
//!   logs/<app_id>.<ts>.log       one log file per run
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Log file timestamp, e.g. `20250106-081500`.
pub const LOG_TIMESTAMP: &str = "%Y%m%d-%H%M%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnvironment {
    /// Started through cargo or from a `target/` directory.
    Development,
    /// Installed binary.
    Production,
}

impl RuntimeEnvironment {
    pub fn detect() -> Self {
        let from_target = std::env::current_exe()
            .map(|exe| exe.components().any(|c| c.as_os_str() == "target"))
            .unwrap_or(false);
        let under_cargo =
            std::env::var_os("CARGO").is_some() || std::env::var_os("CARGO_MANIFEST_DIR").is_some();

        if from_target || under_cargo {
            RuntimeEnvironment::Development
        } else {
            RuntimeEnvironment::Production
        }
    }

    /// Default base directory for this environment.
    fn default_base(self) -> PathBuf {
        match self {
            RuntimeEnvironment::Development => std::env::var_os("CARGO_MANIFEST_DIR")
                .map(PathBuf::from)
                .or_else(|| std::env::current_dir().ok())
                .unwrap_or_else(|| PathBuf::from(".")),
            // XDG_DATA_HOME / Application Support / LocalAppData
            RuntimeEnvironment::Production => dirs::data_local_dir()
                .map(|dir| dir.join("EmploymentForm"))
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

/// Files owned by one application inside the project root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFile<'a> {
    Settings,
    Session,
    Log { timestamp: &'a str },
}

#[derive(Debug, Clone)]
pub struct PathContext {
    environment: RuntimeEnvironment,
    root: Arc<Path>,
    app_id: &'static str,
}

impl PathContext {
    pub fn new(organisation: &str, project_id: &str, app_id: &'static str) -> Self {
        let environment = RuntimeEnvironment::detect();
        Self::rooted(environment, environment.default_base(), organisation, project_id, app_id)
    }

    /// Explicit base directory (debug builds, tests).
    pub fn with_base_path(
        base: impl Into<PathBuf>,
        organisation: &str,
        project_id: &str,
        app_id: &'static str,
    ) -> Self {
        Self::rooted(RuntimeEnvironment::detect(), base.into(), organisation, project_id, app_id)
    }

    fn rooted(
        environment: RuntimeEnvironment,
        base: PathBuf,
        organisation: &str,
        project_id: &str,
        app_id: &'static str,
    ) -> Self {
        Self {
            environment,
            root: base.join(organisation).join(project_id).into(),
            app_id,
        }
    }

    pub fn environment(&self) -> RuntimeEnvironment {
        self.environment
    }

    pub fn app_id(&self) -> &'static str {
        self.app_id
    }

    pub fn project_root(&self) -> &Path {
        &self.root
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn file(&self, file: ProjectFile<'_>) -> PathBuf {
        match file {
            ProjectFile::Settings => self.root.join(format!("{}.settings.ron", self.app_id)),
            ProjectFile::Session => self.data_dir().join(format!("{}.session.json", self.app_id)),
            ProjectFile::Log { timestamp } => {
                self.logs_dir().join(format!("{}.{timestamp}.log", self.app_id))
            }
        }
    }

    pub fn settings_file(&self) -> PathBuf {
        self.file(ProjectFile::Settings)
    }

    pub fn session_file(&self) -> PathBuf {
        self.file(ProjectFile::Session)
    }

    /// Log file for a run starting now.
    pub fn log_file_now(&self) -> PathBuf {
        let timestamp = chrono::Local::now().format(LOG_TIMESTAMP).to_string();
        self.file(ProjectFile::Log {
            timestamp: &timestamp,
        })
    }

    /// Create root, data and logs directories.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        for dir in [self.root.to_path_buf(), self.data_dir(), self.logs_dir()] {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(())
    }
}
