//! CI maintenance toolbox library.
//!
//! This crate provides the core functionality behind the `actions-toolbox`
//! binary: bootstrapping a pinned dotnet tool from source on a Windows
//! runner, and linting GitHub Actions workflow files. It can be consumed
//! programmatically for testing or custom automation.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Pinned-tool configuration and override resolution
//! - [`dirs`] - Directory resolution abstraction for platform-specific paths
//! - [`error`] - Semantic error types with recovery hints
//! - [`exec`] - External command execution abstraction
//! - [`fetch`] - Repository cloning and detached checkout
//! - [`lint`] - Workflow file linting
//! - [`output`] - Progress and dry-run message formatting
//! - [`package`] - dotnet restore, pack, and global tool install
//! - [`pin`] - Validated commit pin and synthetic version derivation
//! - [`pipeline`] - Bootstrap pipeline orchestration
//! - [`platform`] - Runner platform guard
//! - [`sdk`] - .NET SDK detection and version gating

pub mod cli;
pub mod config;
pub mod dirs;
pub mod error;
pub mod exec;
pub mod fetch;
pub mod lint;
pub mod output;
pub mod package;
pub mod pin;
pub mod pipeline;
pub mod platform;
pub mod sdk;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
