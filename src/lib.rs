//! Root filesystem build dispatch for CI pipelines.
//!
//! This crate drives two external rootfs build backends and ships their
//! output to remote storage:
//!
//! - **Config validation** - ordering invariants over the `rootfs_configs`
//!   document, so large generated configuration files stay diff-friendly
//!   and merge-conflict-resistant
//! - **Build dispatch** - per-entry backend selection (debos or buildroot)
//!   and invocation assembly
//! - **Artifact collection** - walking a build output tree and uploading
//!   every file to the storage backend, preserving relative paths
//!
//! The three parts do not call each other. A caller (normally the
//! `rootfs-builder` binary) loads the document, validates it, dispatches
//! the selected builds and uploads each build's output directory.

pub mod build;
pub mod config;
pub mod preflight;
pub mod process;
pub mod storage;
pub mod validate;

pub use config::{BuildrootConfig, DebosConfig, RootfsConfig, RootfsConfigSet};
