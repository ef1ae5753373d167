//! Worker configuration

use crate::generator::DEFAULT_MODEL;
use std::time::Duration;

/// Worker configuration
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Poll interval when no documents are waiting
    pub poll_interval: Duration,

    /// Per-document processing timeout
    pub document_timeout: Duration,

    /// Gemini model to use
    pub model: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            document_timeout: Duration::from_secs(300), // 5 minutes
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl WorkerConfig {
    /// Create a new config builder
    pub fn builder() -> WorkerConfigBuilder {
        WorkerConfigBuilder::default()
    }
}

/// Builder for WorkerConfig
#[derive(Default)]
pub struct WorkerConfigBuilder {
    config: WorkerConfig,
}

impl WorkerConfigBuilder {
    /// Set poll interval
    pub fn poll_interval(mut self, duration: Duration) -> Self {
        self.config.poll_interval = duration;
        self
    }

    /// Set poll interval in seconds
    pub fn poll_interval_secs(mut self, secs: u64) -> Self {
        self.config.poll_interval = Duration::from_secs(secs);
        self
    }

    /// Set per-document timeout
    pub fn document_timeout(mut self, duration: Duration) -> Self {
        self.config.document_timeout = duration;
        self
    }

    /// Set the Gemini model
    pub fn model(mut self, model: &str) -> Self {
        self.config.model = model.to_string();
        self
    }

    /// Build the config
    pub fn build(self) -> WorkerConfig {
        self.config
    }
}
