//! First-run setup
//!
//! Runs once per data directory: the marker file written at the end guards
//! every later launch, so the store flag is written at most once.

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;

use crate::config::{expand_home, Config};
use crate::error::InstallerError;
use crate::process::{CommandRunner, Invocation};
use crate::store::Store;

const RUN_SCRIPT: &str = include_str!("../assets/run.sh");
const RUN_SCRIPT_NAME: &str = "run.sh";
const SERVICE_SETUP_TIMEOUT: Duration = Duration::from_secs(120);

/// What happened to the system service during setup
#[derive(Debug)]
pub enum ServiceRegistration {
    /// No setup script configured
    Skipped,
    Registered { output: String },
    Failed(InstallerError),
}

#[derive(Debug)]
pub enum SetupOutcome {
    AlreadyInitialized,
    Initialized { service: ServiceRegistration },
}

/// Name of the invoking user, passed to the service setup script
fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("LOGNAME"))
        .unwrap_or_else(|_| "root".to_string())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .permissions();
    perms.set_mode(perms.mode() | 0o111);
    std::fs::set_permissions(path, perms)
        .with_context(|| format!("Failed to make {} executable", path.display()))
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
const fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Copy the bundled run script into the data directory unless present
fn install_run_script(data_dir: &Path) -> Result<()> {
    let path = data_dir.join(RUN_SCRIPT_NAME);
    if path.is_file() {
        return Ok(());
    }
    std::fs::write(&path, RUN_SCRIPT)
        .with_context(|| format!("Failed to write run script: {}", path.display()))?;
    make_executable(&path)
}

async fn register_service<R: CommandRunner>(
    config: &Config,
    runner: &R,
    data_dir: &Path,
) -> ServiceRegistration {
    let Some(script) = config.service.setup_script.as_deref() else {
        return ServiceRegistration::Skipped;
    };
    let script = expand_home(script);

    if let Err(err) = make_executable(&script) {
        tracing::warn!("{err:#}");
    }

    let script = script.to_string_lossy().into_owned();
    let user = current_user();
    let dir = data_dir.to_string_lossy().into_owned();
    let invocation = if config.service.sudo {
        Invocation::exec("sudo", [script, user, dir])
    } else {
        Invocation::exec(script, [user, dir])
    };

    match runner.run(&invocation, SERVICE_SETUP_TIMEOUT).await {
        Ok(out) => ServiceRegistration::Registered { output: out.output },
        Err(err) => ServiceRegistration::Failed(err),
    }
}

/// Perform first-run setup unless the marker file exists
///
/// # Errors
/// Returns an error if the data directory, run script, store or marker
/// cannot be written. Service registration failures are reported in the
/// outcome instead.
pub async fn run_first_setup<R: CommandRunner>(config: &Config, runner: &R) -> Result<SetupOutcome> {
    let marker = config.marker_path();
    if marker.exists() {
        tracing::debug!(marker = %marker.display(), "already initialized");
        return Ok(SetupOutcome::AlreadyInitialized);
    }

    let data_dir = config.data_dir();
    tracing::info!(dir = %data_dir.display(), "running first-time setup");
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

    install_run_script(&data_dir)?;
    let store = Store::new(config.store_path());
    if store.is_initialized()? {
        tracing::debug!(store = %store.path().display(), "store already flagged, marker missing");
    } else {
        store.mark_initialized()?;
    }

    let service = register_service(config, runner, &data_dir).await;

    std::fs::write(&marker, chrono::Local::now().to_rfc3339())
        .with_context(|| format!("Failed to write marker: {}", marker.display()))?;

    Ok(SetupOutcome::Initialized { service })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::CommandOutput;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRunner {
        calls: Mutex<Vec<Invocation>>,
        fail: bool,
    }

    impl CommandRunner for RecordingRunner {
        async fn run(
            &self,
            invocation: &Invocation,
            _timeout: Duration,
        ) -> Result<CommandOutput, InstallerError> {
            self.calls.lock().unwrap().push(invocation.clone());
            if self.fail {
                return Err(InstallerError::PermissionDenied {
                    program: "sudo".to_string(),
                });
            }
            Ok(CommandOutput {
                code: Some(0),
                output: "service installed\n".to_string(),
            })
        }
    }

    fn config_in(dir: &Path) -> Config {
        let mut config = Config::default();
        config.data.dir = dir.join("data").to_string_lossy().into_owned();
        config
    }

    #[tokio::test]
    async fn test_first_setup_writes_everything_once() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_in(temp.path());
        let runner = RecordingRunner::default();

        let first = run_first_setup(&config, &runner).await.unwrap();
        assert!(matches!(
            first,
            SetupOutcome::Initialized {
                service: ServiceRegistration::Skipped
            }
        ));
        assert!(config.marker_path().exists());
        assert!(config.data_dir().join("run.sh").is_file());

        let second = run_first_setup(&config, &runner).await.unwrap();
        assert!(matches!(second, SetupOutcome::AlreadyInitialized));

        let store = Store::new(config.store_path());
        assert_eq!(store.all().unwrap().len(), 1);
        assert!(store.is_initialized().unwrap());
        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_marker_does_not_duplicate_store_flag() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_in(temp.path());
        let store = Store::new(config.store_path());
        store.mark_initialized().unwrap();

        let outcome = run_first_setup(&config, &RecordingRunner::default())
            .await
            .unwrap();

        assert!(matches!(outcome, SetupOutcome::Initialized { .. }));
        assert!(config.marker_path().exists());
        assert_eq!(store.all().unwrap().len(), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_script_is_executable() {
        use std::os::unix::fs::PermissionsExt;
        let temp = tempfile::tempdir().unwrap();
        let config = config_in(temp.path());

        run_first_setup(&config, &RecordingRunner::default())
            .await
            .unwrap();

        let mode = std::fs::metadata(config.data_dir().join("run.sh"))
            .unwrap()
            .permissions()
            .mode();
        assert_ne!(mode & 0o111, 0);
    }

    #[tokio::test]
    async fn test_existing_run_script_is_kept() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_in(temp.path());
        std::fs::create_dir_all(config.data_dir()).unwrap();
        std::fs::write(config.data_dir().join("run.sh"), "custom").unwrap();

        run_first_setup(&config, &RecordingRunner::default())
            .await
            .unwrap();

        let content = std::fs::read_to_string(config.data_dir().join("run.sh")).unwrap();
        assert_eq!(content, "custom");
    }

    #[tokio::test]
    async fn test_service_setup_script_runs_through_sudo() {
        let temp = tempfile::tempdir().unwrap();
        let script = temp.path().join("start.sh");
        std::fs::write(&script, "#!/bin/sh\n").unwrap();
        let mut config = config_in(temp.path());
        config.service.setup_script = Some(script.to_string_lossy().into_owned());
        let runner = RecordingRunner::default();

        let outcome = run_first_setup(&config, &runner).await.unwrap();

        assert!(matches!(
            outcome,
            SetupOutcome::Initialized {
                service: ServiceRegistration::Registered { .. }
            }
        ));
        let calls = runner.calls.lock().unwrap();
        assert_eq!(
            calls.as_slice(),
            &[Invocation::exec(
                "sudo",
                [
                    script.to_string_lossy().into_owned(),
                    current_user(),
                    config.data_dir().to_string_lossy().into_owned(),
                ]
            )]
        );
    }

    #[tokio::test]
    async fn test_service_failure_still_completes_setup() {
        let temp = tempfile::tempdir().unwrap();
        let script = temp.path().join("start.sh");
        std::fs::write(&script, "#!/bin/sh\n").unwrap();
        let mut config = config_in(temp.path());
        config.service.setup_script = Some(script.to_string_lossy().into_owned());
        config.service.sudo = false;
        let runner = RecordingRunner {
            fail: true,
            ..RecordingRunner::default()
        };

        let outcome = run_first_setup(&config, &runner).await.unwrap();

        assert!(matches!(
            outcome,
            SetupOutcome::Initialized {
                service: ServiceRegistration::Failed(_)
            }
        ));
        assert!(config.marker_path().exists());
    }
}
