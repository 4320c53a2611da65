//! kiln bootstraps a freshly generated project from a template tree.
//! It substitutes `{{key}}` placeholders and `{{#if key}}` … `{{/if}}` blocks in every
//! file, then initializes version control and the development environment.

/// Command-line interface module for the kiln application
pub mod cli;

/// Running external commands in the project root
pub mod command;

/// Configuration values, defaults and parsing
/// Supports JSON and YAML input as well as `key=value` literals
pub mod config;

/// Common constants
pub mod constants;

/// Core bootstrap orchestration
pub mod engine;

/// Development environment setup actions
pub mod environment;

/// Error types and handling for the kiln application
pub mod error;

/// Logger initialization
pub mod logger;

/// Interactive collection of configuration values
pub mod prompt;

/// Placeholder substitution rules
pub mod substitution;

/// Version-control backends
pub mod vcs;
