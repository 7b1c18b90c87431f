//! Configuration for viewport virtualization

use std::time::Duration;

use serde::Deserialize;

/// Options controlling which nodes count as visible
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Margin added around the viewport on every side before querying
    pub buffer: f64,

    /// Delay used to coalesce rapid viewport changes, in milliseconds
    pub debounce_ms: u64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            buffer: 800.0,
            debounce_ms: 16,
        }
    }
}

impl ViewportConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the viewport buffer
    pub fn with_buffer(mut self, buffer: f64) -> Self {
        self.buffer = buffer;
        self
    }

    /// Set the debounce delay in milliseconds
    pub fn with_debounce_ms(mut self, millis: u64) -> Self {
        self.debounce_ms = millis;
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
