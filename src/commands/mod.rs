//! Command implementations for the repo-import CLI

pub mod providers;
pub mod run;
