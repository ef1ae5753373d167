//! Worker module for polling and processing documents
//!
//! This module provides:
//! - WorkerRunner: Main worker loop that polls for documents in `processing`
//! - DocumentProcessor: Runs the per-document pipeline
//! - WorkerConfig: Configuration for the worker

pub mod config;
pub mod processor;
pub mod runner;

pub use config::WorkerConfig;
pub use processor::DocumentProcessor;
pub use runner::{setup_signal_handler, WorkerRunner};
