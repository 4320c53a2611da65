use std::io;
use std::path::PathBuf;

use kiln::engine::{Stage, Step};
use kiln::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let kiln_err: Error = io_err.into();

    match kiln_err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::ConfigError("invalid config".to_string());
    assert_eq!(err.to_string(), "Configuration error: invalid config.");

    let err = Error::FileError {
        path: PathBuf::from("src/index.js"),
        source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
    };
    assert_eq!(err.to_string(), "Cannot process the file 'src/index.js'. Original error: denied");

    let err = Error::BootstrapAlreadyRun(Stage::Failed);
    assert_eq!(
        err.to_string(),
        "Cannot proceed: this engine has already run a bootstrap (state: failed)."
    );
}

#[test]
fn test_bootstrap_error_names_step() {
    let err = Error::BootstrapError {
        step: Step::InitVersionControl,
        source: Box::new(Error::RepositoryExistsError { path: PathBuf::from("demo") }),
    };
    assert_eq!(
        err.to_string(),
        "Bootstrap failed while initializing version control. \
         Cannot proceed: a repository already exists in 'demo'."
    );
    assert!(std::error::Error::source(&err).is_some());
}
