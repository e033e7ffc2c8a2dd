//! Deployment pipeline behind `crex upload`.
//!
//! A run walks a fixed sequence of states with no loops and no retries:
//!
//! ```text
//! START -> [COMPRESSING] -> UPLOADING -> INSTALLING -> REPORTING -> CLEANUP -> DONE
//! ```
//!
//! `COMPRESSING` is only entered when [`DeployConfig::compress`] is set. Each state
//! has one transition function that either advances with the payload the next
//! state needs or fails. A failure is reported immediately and the run jumps to
//! `CLEANUP`, which always executes: it removes the temporary archive (errors
//! ignored) and stops progress output.
//!
//! Remote calls are strictly sequential. File handles opened by a state are
//! dropped before the next state starts.
//!
//! # Examples
//!
//! ```rust,no_run
//! use crex_cli::client::{ClientOptions, CrexClient};
//! use crex_cli::config::DeployConfig;
//! use crex_cli::deploy::Deployment;
//! use crex_cli::reporter::ConsoleReporter;
//!
//! # async fn example() -> crex_cli::core::Result<()> {
//! let client = CrexClient::new(ClientOptions::default())?;
//! let config = DeployConfig {
//!     compress: true,
//!     compress_folders: vec!["jcr_root".to_string(), "META-INF".to_string()],
//!     ..DeployConfig::default()
//! };
//!
//! let outcome = Deployment::new(&client, config, ConsoleReporter::new()).run().await;
//! assert!(outcome.is_success());
//! # Ok(())
//! # }
//! ```

pub mod report;

use crate::archive::{ArchiveSpec, build_archive};
use crate::client::{ChangeSet, CrexClient, InstallPackageArgs, PackageRef, UploadPackageArgs};
use crate::config::DeployConfig;
use crate::core::CrexError;
use crate::reporter::Reporter;
use report::report_lines;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Observable stages of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStage {
    /// Building the archive from the source folders
    Compressing,
    /// Sending the archive to the remote system
    Uploading,
    /// Synchronous install of the uploaded package
    Installing,
    /// Printing the install change report
    Reporting,
    /// Removing the temporary archive
    Cleanup,
}

impl fmt::Display for DeployStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Compressing => "Compression",
            Self::Uploading => "Upload",
            Self::Installing => "Install",
            Self::Reporting => "Report",
            Self::Cleanup => "Cleanup",
        };
        f.write_str(name)
    }
}

/// The stage that stopped a run and why.
#[derive(Debug)]
pub struct DeployFailure {
    /// Stage whose transition failed
    pub stage: DeployStage,
    /// Underlying error
    pub error: CrexError,
}

impl fmt::Display for DeployFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.error)
    }
}

/// Everything a finished run produced.
#[derive(Debug, Default)]
pub struct DeployOutcome {
    /// Stages entered, in order
    pub stages: Vec<DeployStage>,
    /// Package returned by the upload
    pub package: Option<PackageRef>,
    /// Changes returned by the install
    pub changes: Option<ChangeSet>,
    /// First and only failure, if any
    pub failure: Option<DeployFailure>,
}

impl DeployOutcome {
    /// Whether the run reached `CLEANUP` without a failure.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

enum State {
    Start,
    Compressing,
    Uploading { archive: PathBuf },
    Installing { package: PackageRef },
    Reporting { package: PackageRef, changes: ChangeSet },
    Cleanup,
    Done,
}

enum Transition {
    Advance(State),
    Fail(DeployFailure),
}

fn fail(stage: DeployStage, error: impl Into<CrexError>) -> Transition {
    Transition::Fail(DeployFailure {
        stage,
        error: error.into(),
    })
}

/// One deployment run against a client.
pub struct Deployment<'a, R: Reporter> {
    client: &'a CrexClient,
    config: DeployConfig,
    reporter: R,
}

impl<'a, R: Reporter> Deployment<'a, R> {
    /// Prepare a run; nothing happens until [`Deployment::run`].
    pub fn new(client: &'a CrexClient, config: DeployConfig, reporter: R) -> Self {
        Self {
            client,
            config,
            reporter,
        }
    }

    /// Drive the pipeline to `DONE`.
    ///
    /// Never returns early: failures are reported through the reporter, recorded in
    /// [`DeployOutcome::failure`], and followed by `CLEANUP`.
    pub async fn run(self) -> DeployOutcome {
        let mut outcome = DeployOutcome::default();
        let mut state = State::Start;

        loop {
            let transition = match state {
                State::Start => self.start(),
                State::Compressing => {
                    outcome.stages.push(DeployStage::Compressing);
                    self.compress().await
                }
                State::Uploading { archive } => {
                    outcome.stages.push(DeployStage::Uploading);
                    self.upload(&archive).await
                }
                State::Installing { package } => {
                    outcome.stages.push(DeployStage::Installing);
                    self.install(package).await
                }
                State::Reporting { package, changes } => {
                    outcome.stages.push(DeployStage::Reporting);
                    let next = self.report(&package, &changes);
                    outcome.package = Some(package);
                    outcome.changes = Some(changes);
                    next
                }
                State::Cleanup => {
                    outcome.stages.push(DeployStage::Cleanup);
                    self.cleanup().await
                }
                State::Done => break,
            };

            state = match transition {
                Transition::Advance(next) => next,
                Transition::Fail(failure) => {
                    self.reporter.fail(&failure.to_string());
                    outcome.failure = Some(failure);
                    State::Cleanup
                }
            };
        }

        outcome
    }

    fn archive_path(&self) -> PathBuf {
        PathBuf::from(&self.config.package_name)
    }

    fn start(&self) -> Transition {
        self.reporter.start("Preparing package");
        if self.config.compress {
            Transition::Advance(State::Compressing)
        } else {
            Transition::Advance(State::Uploading {
                archive: self.archive_path(),
            })
        }
    }

    async fn compress(&self) -> Transition {
        let archive = self.archive_path();
        self.reporter.progress(&format!("Compressing {}", self.config.compress_folders.join(", ")));

        let spec = ArchiveSpec {
            source_folders: self.config.compress_folders.clone(),
            ignore_patterns: self.config.omit.clone(),
            output_path: archive.clone(),
        };

        match build_archive(spec).await {
            Ok(summary) => {
                debug!("Archive {} holds {} entries", summary.path.display(), summary.entries.len());
                Transition::Advance(State::Uploading { archive })
            }
            Err(e) => fail(DeployStage::Compressing, e),
        }
    }

    async fn upload(&self, archive: &Path) -> Transition {
        self.reporter.progress(&format!("Uploading package to {}", self.client.address()));

        let file = match tokio::fs::File::open(archive).await {
            Ok(file) => file,
            Err(e) => return fail(DeployStage::Uploading, e),
        };
        let file_name = archive
            .file_name()
            .map_or_else(|| self.config.package_name.clone(), |n| n.to_string_lossy().into_owned());

        match self.client.upload_package(UploadPackageArgs { file, file_name }).await {
            Ok(package) => {
                self.reporter.succeed(&format!(
                    "Package {} uploaded on {}",
                    package.name,
                    self.client.address()
                ));
                Transition::Advance(State::Installing { package })
            }
            Err(e) => fail(DeployStage::Uploading, e),
        }
    }

    async fn install(&self, package: PackageRef) -> Transition {
        self.reporter.progress("Installing package");

        let args = InstallPackageArgs {
            package_id: package.package_id.clone(),
            synchronous: true,
        };
        match self.client.install_package(&args).await {
            Ok(changes) => Transition::Advance(State::Reporting { package, changes }),
            Err(e) => fail(DeployStage::Installing, e),
        }
    }

    fn report(&self, package: &PackageRef, changes: &ChangeSet) -> Transition {
        self.reporter.succeed(&format!(
            "Package {} installed on {}",
            package.name,
            self.client.address()
        ));
        info!("Install of {} changed {} files", package.package_id, changes.total());

        for line in report_lines(changes) {
            self.reporter.line(&line);
        }
        Transition::Advance(State::Cleanup)
    }

    async fn cleanup(&self) -> Transition {
        if self.config.compress {
            self.reporter.progress("Cleaning up");
            let archive = self.archive_path();
            if let Err(e) = tokio::fs::remove_file(&archive).await {
                debug!("Ignoring failure to remove {}: {}", archive.display(), e);
            }
        }
        self.reporter.stop();
        Transition::Advance(State::Done)
    }
}
