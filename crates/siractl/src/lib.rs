//! Sira Control - terminal client for the Sira instrument-tracking backend.
//!
//! The dashboard polls the backend, folds per-resource results into one
//! snapshot per cycle, and renders it into fixed sections with transient
//! toast notifications. One-shot subcommands cover scripted use.

pub mod client;
pub mod commands;
pub mod controller;
pub mod logging;
pub mod snapshot;
pub mod tui;
