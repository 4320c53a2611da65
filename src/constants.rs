//! Common constants used throughout kiln.

/// Message of the single commit created by the version-control stage
pub const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";

/// Repository metadata directory, never rewritten and never re-initialized
pub const GIT_DIR: &str = ".git";

/// Editor configuration directory ensured by the environment stage
pub const EDITOR_CONFIG_DIR: &str = ".vscode";

/// Prefix of the environment variables handed to setup commands
pub const ENV_PREFIX: &str = "KILN_";

/// Opening and closing conditional markers
pub const CONDITIONAL_OPEN_PREFIX: &str = "{{#if ";
pub const CONDITIONAL_CLOSE: &str = "{{/if}}";

/// What a disabled conditional block is wrapped in
pub const COMMENT_OPEN: &str = "/*";
pub const COMMENT_CLOSE: &str = "*/";

/// Known configuration keys and their defaults
pub mod defaults {
    pub const PROJECT_NAME: &str = "projectName";
    pub const PROJECT_DESCRIPTION: &str = "projectDescription";
    pub const AUTHOR_NAME: &str = "authorName";
    pub const AUTHOR_EMAIL: &str = "authorEmail";
    pub const REPOSITORY_URL: &str = "repositoryUrl";
    pub const LICENSE: &str = "license";
    pub const DOCKER_SUPPORT: &str = "dockerSupport";
    pub const PORT: &str = "port";

    pub const DEFAULT_LICENSE: &str = "MIT";
    pub const DEFAULT_PORT: u64 = 3000;
}
