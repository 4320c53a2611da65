//! Development environment setup.
//! Setup actions only run for projects with container support enabled; the
//! editor configuration directory is always ensured.

use std::path::{Path, PathBuf};

use crate::command::run_shell;
use crate::config::Configuration;
use crate::constants::{EDITOR_CONFIG_DIR, ENV_PREFIX};
use crate::error::{Error, Result};

/// A step run by the environment stage when `dockerSupport` is enabled.
pub trait SetupAction {
    /// Short name used in log output.
    fn name(&self) -> &str;

    fn run(&self, root: &Path, config: &Configuration) -> Result<()>;
}

/// Runs a shell command line in the project root.
///
/// The configuration is exported to the command as `KILN_<KEY>` variables, e.g.
/// `projectName` becomes `KILN_PROJECT_NAME`.
#[derive(Debug, Clone)]
pub struct CommandAction {
    command_line: String,
}

impl CommandAction {
    pub fn new<S: Into<String>>(command_line: S) -> Self {
        Self { command_line: command_line.into() }
    }
}

impl SetupAction for CommandAction {
    fn name(&self) -> &str {
        &self.command_line
    }

    fn run(&self, root: &Path, config: &Configuration) -> Result<()> {
        let stdout = run_shell(root, &self.command_line, &env_vars(config))?;
        if !stdout.trim().is_empty() {
            log::info!("{}", stdout.trim_end());
        }
        Ok(())
    }
}

/// Converts a camelCase configuration key to its upper snake case variable name.
pub fn env_var_name(key: &str) -> String {
    let mut name = String::from(ENV_PREFIX);
    let mut previous_lower = false;
    for c in key.chars() {
        if c.is_ascii_alphanumeric() {
            if c.is_ascii_uppercase() && previous_lower {
                name.push('_');
            }
            previous_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
            name.push(c.to_ascii_uppercase());
        } else {
            previous_lower = false;
            name.push('_');
        }
    }
    name
}

fn env_vars(config: &Configuration) -> Vec<(String, String)> {
    config.iter().map(|(key, value)| (env_var_name(key), value.to_string())).collect()
}

/// Creates the editor configuration directory below `root` if it is missing.
pub fn ensure_editor_config(root: &Path) -> Result<PathBuf> {
    let path = root.join(EDITOR_CONFIG_DIR);
    std::fs::create_dir_all(&path)
        .map_err(|source| Error::DirectoryError { path: path.clone(), source })?;
    Ok(path)
}
