use serde_derive::{Deserialize, Serialize};

use crate::detection::Detection;

/// Detector output for one video frame.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Frame {
    /// Opaque label copied into every crossing emitted for this frame.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub detections: Vec<Detection>,
}

impl Frame {
    pub fn new(timestamp: impl Into<String>, detections: Vec<Detection>) -> Self {
        Self {
            timestamp: timestamp.into(),
            detections,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Detection> {
        self.detections.iter()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}
