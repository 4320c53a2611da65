use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};

use crate::error::{Error, Result};

/// Runs `program` with `args` inside `working_dir` and waits for it to finish.
///
/// # Returns
/// * `Result<String>` - Captured stdout of the command
///
/// # Notes
/// - stdout and stderr are captured so a failure can report what the tool printed
/// - Non-zero exit codes are treated as errors
pub fn run_command<I, S>(
    working_dir: &Path,
    program: &str,
    args: I,
    envs: &[(String, String)],
) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command.args(args).current_dir(working_dir);
    for (key, value) in envs {
        command.env(key, value);
    }

    let display = describe(&command);
    log::debug!("Running '{}' in {}", display, working_dir.display());

    let output = command.output()?;
    check_output(display, output)
}

/// Runs a whole command line through the platform shell.
pub fn run_shell(working_dir: &Path, command_line: &str, envs: &[(String, String)]) -> Result<String> {
    if cfg!(windows) {
        run_command(working_dir, "cmd", ["/C", command_line], envs)
    } else {
        run_command(working_dir, "sh", ["-c", command_line], envs)
    }
}

fn describe(command: &Command) -> String {
    let mut parts = vec![command.get_program().to_string_lossy().into_owned()];
    parts.extend(command.get_args().map(|arg| arg.to_string_lossy().into_owned()));
    parts.join(" ")
}

fn check_output(command: String, output: Output) -> Result<String> {
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::CommandError {
            command,
            status: output.status,
            output: format!("{}{}", stdout, stderr).trim().to_string(),
        });
    }
    Ok(stdout)
}
