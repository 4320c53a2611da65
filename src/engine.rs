//! The bootstrap template engine.
//!
//! A [`TemplateEngine`] rewrites a freshly materialized template tree in place and then
//! runs the follow-up steps, strictly in order:
//!
//! 1. substitute placeholders in every file below the root
//! 2. initialize version control (init, stage everything, initial commit)
//! 3. configure the development environment
//!
//! The first failure stops the run. Nothing is rolled back: files rewritten before the
//! failure keep their new content.

use log::{debug, error, info};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{Configuration, PartialConfig};
use crate::constants::{GIT_DIR, INITIAL_COMMIT_MESSAGE};
use crate::environment::{ensure_editor_config, SetupAction};
use crate::error::{Error, Result};
use crate::substitution::SubstitutionTable;
use crate::vcs::{Git2VersionControl, VersionControl};

/// Where a bootstrap run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Constructed,
    TemplateSubstituted,
    VersionControlInitialized,
    EnvironmentConfigured,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Constructed => "constructed",
            Stage::TemplateSubstituted => "template substituted",
            Stage::VersionControlInitialized => "version control initialized",
            Stage::EnvironmentConfigured => "environment configured",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// One step of the bootstrap pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    SubstituteTemplates,
    InitVersionControl,
    SetupDevEnvironment,
}

impl Step {
    pub const ALL: [Step; 3] =
        [Step::SubstituteTemplates, Step::InitVersionControl, Step::SetupDevEnvironment];

    /// The stage reached once this step succeeds.
    pub fn reaches(self) -> Stage {
        match self {
            Step::SubstituteTemplates => Stage::TemplateSubstituted,
            Step::InitVersionControl => Stage::VersionControlInitialized,
            Step::SetupDevEnvironment => Stage::EnvironmentConfigured,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::SubstituteTemplates => "substituting templates",
            Step::InitVersionControl => "initializing version control",
            Step::SetupDevEnvironment => "setting up the development environment",
        };
        f.write_str(name)
    }
}

/// Substitutes configuration values into a template tree and bootstraps the project.
pub struct TemplateEngine {
    config: Configuration,
    table: SubstitutionTable,
    root: PathBuf,
    version_control: Box<dyn VersionControl>,
    setup_actions: Vec<Box<dyn SetupAction>>,
    stage: Stage,
}

impl TemplateEngine {
    /// Creates an engine for the current working directory.
    ///
    /// `partial` is merged over the known defaults and the substitution table is built
    /// right away. No I/O happens here.
    pub fn new(partial: PartialConfig) -> Self {
        let config = Configuration::new(partial);
        let table = SubstitutionTable::from_config(&config);
        Self {
            config,
            table,
            root: PathBuf::from("."),
            version_control: Box::new(Git2VersionControl::new()),
            setup_actions: Vec::new(),
            stage: Stage::Constructed,
        }
    }

    pub fn with_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_version_control<V: VersionControl + 'static>(mut self, version_control: V) -> Self {
        self.version_control = Box::new(version_control);
        self
    }

    /// Adds an action run by [`TemplateEngine::setup_dev_environment`] when
    /// `dockerSupport` is enabled. Actions run in the order they were added.
    pub fn with_setup_action<A: SetupAction + 'static>(mut self, action: A) -> Self {
        self.setup_actions.push(Box::new(action));
        self
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn table(&self) -> &SubstitutionTable {
        &self.table
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Rewrites a single file in place with every substitution rule applied.
    ///
    /// # Errors
    /// * `Error::FileError` if the file cannot be read as UTF-8 or written back
    pub fn process_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file_error = |source: std::io::Error| {
            error!("Error processing {}: {}", path.display(), source);
            Error::FileError { path: path.to_path_buf(), source }
        };

        let content = fs::read_to_string(path).map_err(file_error)?;
        let rendered = self.table.apply(&content);
        fs::write(path, rendered).map_err(file_error)?;

        info!("Processed: '{}'", path.display());
        Ok(())
    }

    /// Processes every file below `path`, depth first.
    ///
    /// Symbolic links are followed. The first error stops the traversal; files processed
    /// before it keep their new content.
    ///
    /// # Returns
    /// * `Result<usize>` - Number of files processed
    ///
    /// # Errors
    /// * `Error::TraversalCycle` if a link leads back into one of its ancestors
    /// * `Error::DirectoryError` if an entry cannot be listed or inspected
    /// * `Error::FileError` from [`TemplateEngine::process_file`]
    pub fn process_directory<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let path = path.as_ref();
        debug!("Processing directory {}", path.display());

        let mut processed = 0;
        let walker = WalkDir::new(path)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_repository_dir(entry));
        for entry in walker {
            let entry = entry.map_err(traversal_error)?;
            if entry.file_type().is_dir() {
                continue;
            }
            self.process_file(entry.path())?;
            processed += 1;
        }
        Ok(processed)
    }

    /// Initializes a repository in the root, stages everything and commits it.
    ///
    /// Steps run in order and the first failure aborts the rest. Completed steps are
    /// not undone.
    pub fn init_version_control(&self) -> Result<()> {
        let version_control = &self.version_control;
        debug!("Initializing version control with {}", version_control.name());

        let pipeline = || -> Result<()> {
            version_control.init(&self.root)?;
            version_control.stage_all(&self.root)?;
            version_control.commit(&self.root, INITIAL_COMMIT_MESSAGE, &self.config)
        };
        pipeline().inspect_err(|e| error!("Error initializing version control: {}", e))?;

        info!("Git repository initialized");
        Ok(())
    }

    /// Runs the setup actions when `dockerSupport` is enabled, then ensures the
    /// editor configuration directory exists.
    pub fn setup_dev_environment(&self) -> Result<()> {
        let configure = || -> Result<()> {
            if self.config.docker_support() {
                info!("Setting up container environment...");
                for action in &self.setup_actions {
                    debug!("Running setup action '{}'", action.name());
                    action.run(&self.root, &self.config)?;
                }
            }
            ensure_editor_config(&self.root)?;
            Ok(())
        };
        configure().inspect_err(|e| error!("Error setting up dev environment: {}", e))?;

        info!("Development environment configured");
        Ok(())
    }

    /// Runs the whole pipeline: substitution, version control, environment setup.
    ///
    /// A bootstrap is one-shot. Any failure leaves the engine in [`Stage::Failed`] and is
    /// returned as `Error::BootstrapError` naming the failed step; deciding whether that
    /// ends the process is up to the caller.
    ///
    /// # Errors
    /// * `Error::BootstrapAlreadyRun` if this engine already ran a bootstrap
    /// * `Error::BootstrapError` wrapping the first failure
    pub fn bootstrap(&mut self) -> Result<()> {
        if self.stage != Stage::Constructed {
            return Err(Error::BootstrapAlreadyRun(self.stage));
        }
        info!("Starting project bootstrap in {}...", self.root.display());

        for step in Step::ALL {
            let outcome = match step {
                Step::SubstituteTemplates => self.process_directory(&self.root).map(|count| {
                    debug!("Substituted placeholders in {} files", count);
                }),
                Step::InitVersionControl => self.init_version_control(),
                Step::SetupDevEnvironment => self.setup_dev_environment(),
            };

            if let Err(e) = outcome {
                self.stage = Stage::Failed;
                error!("Bootstrap failed while {}", step);
                return Err(Error::BootstrapError { step, source: Box::new(e) });
            }
            self.stage = step.reaches();
        }

        self.stage = Stage::Done;
        info!("Project {} has been bootstrapped successfully!", self.config.project_name());
        Ok(())
    }
}

/// Repository metadata is left to the version-control stage.
fn is_repository_dir(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name() == GIT_DIR
}

fn traversal_error(err: walkdir::Error) -> Error {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    if let Some(ancestor) = err.loop_ancestor() {
        let err = Error::TraversalCycle { path, ancestor: ancestor.to_path_buf() };
        error!("{}", err);
        return err;
    }

    let message = err.to_string();
    let source = err.into_io_error().unwrap_or_else(|| std::io::Error::other(message));
    error!("Error processing directory {}: {}", path.display(), source);
    Error::DirectoryError { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Records every call instead of touching a repository.
    #[derive(Clone, Default)]
    struct RecordingVcs {
        calls: Rc<RefCell<Vec<String>>>,
        fail_on: Option<&'static str>,
    }

    impl RecordingVcs {
        fn record(&self, call: &str) -> Result<()> {
            self.calls.borrow_mut().push(call.to_string());
            if self.fail_on == Some(call) {
                return Err(Error::ConfigError(format!("{call} refused")));
            }
            Ok(())
        }
    }

    impl VersionControl for RecordingVcs {
        fn name(&self) -> &str {
            "recording"
        }

        fn init(&self, _root: &Path) -> Result<()> {
            self.record("init")
        }

        fn stage_all(&self, _root: &Path) -> Result<()> {
            self.record("stage_all")
        }

        fn commit(&self, _root: &Path, message: &str, _config: &Configuration) -> Result<()> {
            self.record(&format!("commit {message}"))
        }
    }

    #[test]
    fn test_construction_is_pure() {
        let engine = TemplateEngine::new(PartialConfig::new());
        assert_eq!(engine.stage(), Stage::Constructed);
        assert_eq!(engine.root(), Path::new("."));
        assert_eq!(engine.table().len(), 9);
    }

    #[test]
    fn test_version_control_steps_run_in_order() {
        let vcs = RecordingVcs::default();
        let engine = TemplateEngine::new(PartialConfig::new()).with_version_control(vcs.clone());

        engine.init_version_control().unwrap();

        assert_eq!(*vcs.calls.borrow(), vec!["init", "stage_all", "commit Initial commit"]);
    }

    #[test]
    fn test_version_control_stops_at_first_failure() {
        let vcs = RecordingVcs { fail_on: Some("stage_all"), ..Default::default() };
        let engine = TemplateEngine::new(PartialConfig::new()).with_version_control(vcs.clone());

        assert!(engine.init_version_control().is_err());
        assert_eq!(*vcs.calls.borrow(), vec!["init", "stage_all"]);
    }

    #[test]
    fn test_bootstrap_reaches_done_and_is_one_shot() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = TemplateEngine::new(PartialConfig::new())
            .with_root(temp_dir.path())
            .with_version_control(RecordingVcs::default());

        engine.bootstrap().unwrap();
        assert_eq!(engine.stage(), Stage::Done);

        match engine.bootstrap() {
            Err(Error::BootstrapAlreadyRun(Stage::Done)) => (),
            other => panic!("Expected BootstrapAlreadyRun, got {other:?}"),
        }
    }

    #[test]
    fn test_bootstrap_failure_skips_remaining_steps() {
        let temp_dir = TempDir::new().unwrap();
        let vcs = RecordingVcs { fail_on: Some("init"), ..Default::default() };
        let mut engine = TemplateEngine::new(PartialConfig::new())
            .with_root(temp_dir.path())
            .with_version_control(vcs);

        match engine.bootstrap() {
            Err(Error::BootstrapError { step, .. }) => assert_eq!(step, Step::InitVersionControl),
            other => panic!("Expected BootstrapError, got {other:?}"),
        }
        assert_eq!(engine.stage(), Stage::Failed);
        assert!(!temp_dir.path().join(".vscode").exists());
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::VersionControlInitialized.to_string(), "version control initialized");
        assert_eq!(Step::SubstituteTemplates.to_string(), "substituting templates");
    }
}
