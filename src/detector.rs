use image::RgbImage;
use std::path::PathBuf;

use crate::detection::Detection;
use crate::error::Error;

pub const DEFAULT_DEVICE: &str = "cpu";

#[derive(Debug, Clone)]
pub struct DetectorConfig {
    pub model_path: PathBuf,
    pub device: String,
}

impl DetectorConfig {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            device: DEFAULT_DEVICE.to_string(),
        }
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !self.model_path.exists() {
            return Err(Error::InvalidModelPath(self.model_path.clone()));
        }

        Ok(())
    }
}

/// Object detector with a persistent tracker.
///
/// Implementations keep their own tracker state between calls to
/// [`Detector::track`]; [`Detector::load`] must discard it.
pub trait Detector {
    /// (Re)loads the model described by `config`. Failures are reported as
    /// [`Error::ModelLoad`].
    fn load(&mut self, config: &DetectorConfig) -> Result<(), Error>;

    /// Detects and tracks objects on one frame.
    fn track(&mut self, image: &RgbImage) -> Result<Vec<Detection>, Error>;
}
