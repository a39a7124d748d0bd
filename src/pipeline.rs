use image::RgbImage;
use tracing::{info, warn};

use crate::crossing::{CrossingEngine, EngineConfig};
use crate::detector::{Detector, DetectorConfig};
use crate::error::Error;
use crate::frame::Frame;
use crate::line::{self, Line};
use crate::overlay::{self, VizMode};
use crate::CrossingSink;

struct Loaded<D> {
    detector: D,
    config: DetectorConfig,
}

/// Detector + crossing engine + overlay, driven once per video frame.
pub struct Counter<D: Detector> {
    engine: CrossingEngine,
    loaded: Option<Loaded<D>>,
    viz_mode: VizMode,
}

impl<D: Detector> Counter<D> {
    pub fn new(config: EngineConfig, viz_mode: VizMode) -> Result<Self, Error> {
        Ok(Self {
            engine: CrossingEngine::new(config)?,
            loaded: None,
            viz_mode,
        })
    }

    #[inline]
    pub fn engine(&self) -> &CrossingEngine {
        &self.engine
    }

    #[inline]
    pub fn viz_mode(&self) -> VizMode {
        self.viz_mode
    }

    pub fn set_viz_mode(&mut self, mode: VizMode) {
        info!(?mode, "viz mode changed");
        self.viz_mode = mode;
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.loaded.is_some()
    }

    /// Loads `detector` with `config` and starts from an empty track store.
    /// On failure the previously attached detector, if any, stays in place.
    pub fn attach(&mut self, mut detector: D, config: DetectorConfig) -> Result<(), Error> {
        config.validate()?;
        detector.load(&config)?;

        info!(
            model = %config.model_path.display(),
            device = %config.device,
            "detector loaded"
        );

        self.loaded = Some(Loaded { detector, config });
        self.engine.reset();

        Ok(())
    }

    #[inline]
    pub fn device(&self) -> Option<&str> {
        self.loaded.as_ref().map(|loaded| loaded.config.device.as_str())
    }

    /// Reloads the detector on another device; track histories are dropped.
    ///
    /// If the new device fails to load, the detector is reloaded on the
    /// previous one and the error is returned. If that reload fails too, the
    /// detector is detached.
    pub fn select_device(&mut self, device: &str) -> Result<(), Error> {
        self.engine.reset();

        let loaded = match self.loaded.as_mut() {
            Some(loaded) => loaded,
            None => return Ok(()),
        };

        let config = loaded.config.clone().with_device(device);
        let err = match loaded.detector.load(&config) {
            Ok(()) => {
                info!(device, "device changed");
                loaded.config = config;
                return Ok(());
            }
            Err(err) => err,
        };

        warn!(device, previous = %loaded.config.device, "{}", err);

        if let Err(restore) = loaded.detector.load(&loaded.config) {
            warn!("{}", restore);
            self.loaded = None;
        }

        Err(err)
    }

    /// Replaces the track store and reloads the detector, if one is attached.
    /// A detector that fails to reload is detached.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.engine.reset();

        let loaded = match self.loaded.as_mut() {
            Some(loaded) => loaded,
            None => return Ok(()),
        };

        if let Err(err) = loaded.detector.load(&loaded.config) {
            self.loaded = None;
            return Err(err);
        }

        Ok(())
    }

    /// Runs detection, crossing evaluation and rendering on one frame.
    ///
    /// Without an attached detector the image comes back untouched. A detector
    /// failure is treated as a frame without detections.
    pub fn process<S>(
        &mut self,
        mut image: RgbImage,
        lines: &[Line],
        timestamp: &str,
        sink: &mut S,
    ) -> Result<RgbImage, Error>
    where
        S: CrossingSink + ?Sized,
    {
        let loaded = match self.loaded.as_mut() {
            Some(loaded) => loaded,
            None => return Ok(image),
        };

        line::validate_lines(lines)?;

        let detections = loaded.detector.track(&image).unwrap_or_else(|err| {
            warn!(timestamp, "{}", err);
            Vec::new()
        });

        let frame = Frame::new(timestamp, detections);
        self.engine.process_frame(&frame, lines, sink)?;

        overlay::draw(&mut image, self.viz_mode, &frame, lines, self.engine.store());

        Ok(image)
    }
}
