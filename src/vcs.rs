//! Version-control backends for the repository initialization stage.

use git2::{IndexAddOption, Repository, Signature};
use log::debug;
use std::path::Path;

use crate::command::run_command;
use crate::config::Configuration;
use crate::constants::defaults::{AUTHOR_EMAIL, AUTHOR_NAME};
use crate::constants::GIT_DIR;
use crate::error::{Error, Result};

/// The three steps the bootstrap runs, in order, against the project root.
pub trait VersionControl {
    /// Short name used in log output.
    fn name(&self) -> &str;

    /// Creates a new repository in `root`.
    ///
    /// # Errors
    /// * `Error::RepositoryExistsError` if `root` already holds a repository
    fn init(&self, root: &Path) -> Result<()>;

    /// Stages every file below `root`.
    fn stage_all(&self, root: &Path) -> Result<()>;

    /// Records the staged files as the first commit.
    fn commit(&self, root: &Path, message: &str, config: &Configuration) -> Result<()>;
}

fn ensure_no_repository(root: &Path) -> Result<()> {
    if root.join(GIT_DIR).exists() {
        return Err(Error::RepositoryExistsError { path: root.to_path_buf() });
    }
    Ok(())
}

/// Author configured for the project, when both name and email are set.
fn configured_author(config: &Configuration) -> Option<(String, String)> {
    Some((config.non_empty(AUTHOR_NAME)?, config.non_empty(AUTHOR_EMAIL)?))
}

/// Backend built on libgit2.
#[derive(Debug, Default)]
pub struct Git2VersionControl;

impl Git2VersionControl {
    pub fn new() -> Self {
        Self
    }

    fn signature(repo: &Repository, config: &Configuration) -> Result<Signature<'static>> {
        match configured_author(config) {
            Some((name, email)) => Ok(Signature::now(&name, &email)?),
            None => Ok(repo.signature()?),
        }
    }
}

impl VersionControl for Git2VersionControl {
    fn name(&self) -> &str {
        "libgit2"
    }

    fn init(&self, root: &Path) -> Result<()> {
        ensure_no_repository(root)?;
        Repository::init(root)?;
        debug!("Initialized repository in {}", root.display());
        Ok(())
    }

    fn stage_all(&self, root: &Path) -> Result<()> {
        let repo = Repository::open(root)?;
        let mut index = repo.index()?;
        index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
        index.write()?;
        debug!("Staged {} entries", index.len());
        Ok(())
    }

    fn commit(&self, root: &Path, message: &str, config: &Configuration) -> Result<()> {
        let repo = Repository::open(root)?;
        let tree_id = repo.index()?.write_tree()?;
        let tree = repo.find_tree(tree_id)?;
        let signature = Self::signature(&repo, config)?;
        let commit_id = repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &[])?;
        debug!("Created commit {}", commit_id);
        Ok(())
    }
}

/// Backend that shells out to the `git` executable.
#[derive(Debug, Default)]
pub struct GitCommandVersionControl;

impl GitCommandVersionControl {
    pub fn new() -> Self {
        Self
    }
}

impl VersionControl for GitCommandVersionControl {
    fn name(&self) -> &str {
        "git"
    }

    fn init(&self, root: &Path) -> Result<()> {
        ensure_no_repository(root)?;
        run_command(root, "git", ["init"], &[])?;
        Ok(())
    }

    fn stage_all(&self, root: &Path) -> Result<()> {
        run_command(root, "git", ["add", "."], &[])?;
        Ok(())
    }

    fn commit(&self, root: &Path, message: &str, config: &Configuration) -> Result<()> {
        let mut args: Vec<String> = Vec::new();
        if let Some((name, email)) = configured_author(config) {
            args.extend(["-c".to_string(), format!("user.name={name}")]);
            args.extend(["-c".to_string(), format!("user.email={email}")]);
        }
        // An empty template tree still gets its initial commit.
        args.extend(["commit", "--allow-empty", "-m", message].map(String::from));
        run_command(root, "git", &args, &[])?;
        Ok(())
    }
}
