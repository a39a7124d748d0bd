use nalgebra as na;
use serde_derive::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::frame::Frame;
use crate::geometry;
use crate::line::{self, Line, LineId};
use crate::track_store::{TrackStore, DEFAULT_HISTORY_LEN};
use crate::{CrossingSink, TrackId};

/// Tracks with fewer retained positions than this are not evaluated.
const MIN_TRAJECTORY_POINTS: usize = 2;

/// Which way a track went through a line, relative to the order in which the
/// line's points were drawn.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Forward,
    Backward,
    Indeterminate,
}

impl Direction {
    /// Negative cross product is `Forward`, positive is `Backward`.
    #[inline]
    pub fn from_cross(cross: f64) -> Self {
        if cross < 0.0 {
            Direction::Forward
        } else if cross > 0.0 {
            Direction::Backward
        } else {
            Direction::Indeterminate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => "Forward",
            Self::Backward => "Backward",
            Self::Indeterminate => "Indeterminate",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CrossingEvent {
    pub line_id: LineId,
    pub track_id: TrackId,
    pub crossing_time: String,
    pub vehicle_class: String,
    pub direction: Direction,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of most recent positions kept per track.
    pub history_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_len: DEFAULT_HISTORY_LEN,
        }
    }
}

impl EngineConfig {
    pub fn new(history_len: usize) -> Self {
        Self { history_len }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.history_len < MIN_TRAJECTORY_POINTS {
            return Err(Error::InvalidConfig(format!(
                "history_len must be at least {}, got {}",
                MIN_TRAJECTORY_POINTS, self.history_len
            )));
        }

        Ok(())
    }
}

/// Per-frame line crossing evaluation.
///
/// Owns the [`TrackStore`]; every call to [`CrossingEngine::process_frame`]
/// prunes vanished tracks, appends the new centroids and reports each
/// (track, line) pair at most once.
pub struct CrossingEngine {
    config: EngineConfig,
    store: TrackStore,
}

impl CrossingEngine {
    pub fn new(config: EngineConfig) -> Result<Self, Error> {
        config.validate()?;

        Ok(Self {
            store: TrackStore::with_history_len(config.history_len),
            config,
        })
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn store(&self) -> &TrackStore {
        &self.store
    }

    /// Throws away every track history by replacing the store.
    pub fn reset(&mut self) {
        info!(tracks = self.store.len(), "resetting track store");
        self.store = TrackStore::with_history_len(self.config.history_len);
    }

    /// Runs one frame through the engine and returns the number of events
    /// delivered to `sink`.
    ///
    /// Invalid lines are reported before any state changes. Malformed
    /// detections are skipped; a detection that still carries a track id keeps
    /// that track alive for the frame.
    pub fn process_frame<S>(
        &mut self,
        frame: &Frame,
        lines: &[Line],
        sink: &mut S,
    ) -> Result<usize, Error>
    where
        S: CrossingSink + ?Sized,
    {
        line::validate_lines(lines)?;

        let mut active: HashSet<TrackId> = HashSet::with_capacity(frame.len());
        let mut seen: HashSet<TrackId> = HashSet::with_capacity(frame.len());
        let mut valid = Vec::with_capacity(frame.len());

        for (index, det) in frame.iter().enumerate() {
            if let Some(id) = det.track_id {
                active.insert(id);
            }

            match det.checked_id(index) {
                Ok(id) if !seen.insert(id) => {
                    warn!(track_id = id, index, "duplicate track id in frame, detection skipped")
                }
                Ok(id) => valid.push((id, det)),
                Err(err) => warn!(timestamp = %frame.timestamp, "{}", err),
            }
        }

        self.store.prune(&active);

        for &(id, det) in &valid {
            self.store.upsert(id, det.bbox.center(), &det.label);
        }

        let mut emitted = 0;

        for line in lines {
            let endpoints = match line.endpoints() {
                Some(endpoints) => endpoints,
                None => continue,
            };

            for &(id, _) in &valid {
                if let Some(event) = self.evaluate(id, line, endpoints, &frame.timestamp) {
                    info!(
                        line = %event.line_id,
                        track_id = event.track_id,
                        class = %event.vehicle_class,
                        direction = %event.direction,
                        "crossing"
                    );
                    sink.on_crossing(event);
                    emitted += 1;
                }
            }
        }

        debug!(
            timestamp = %frame.timestamp,
            tracks = self.store.len(),
            emitted,
            "frame processed"
        );

        Ok(emitted)
    }

    /// Evaluates one (track, line) pair and marks it counted on a hit.
    fn evaluate(
        &mut self,
        id: TrackId,
        line: &Line,
        endpoints: (na::Point2<f32>, na::Point2<f32>),
        timestamp: &str,
    ) -> Option<CrossingEvent> {
        let track = self.store.get_mut(id)?;

        if track.len() < MIN_TRAJECTORY_POINTS || track.is_counted(&line.id) {
            return None;
        }

        let trajectory = track.trajectory();
        if !geometry::polylines_intersect(&line.geometry, &trajectory) {
            return None;
        }

        let direction = geometry::direction(endpoints, track.heading()?);
        let vehicle_class = track.majority_label()?.to_string();

        track.mark_counted(&line.id);

        Some(CrossingEvent {
            line_id: line.id.clone(),
            track_id: id,
            crossing_time: timestamp.to_string(),
            vehicle_class,
            direction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_cross() {
        assert_eq!(Direction::from_cross(-0.5), Direction::Forward);
        assert_eq!(Direction::from_cross(3.0), Direction::Backward);
        assert_eq!(Direction::from_cross(0.0), Direction::Indeterminate);
        assert_eq!(Direction::Forward.to_string(), "Forward");
    }

    #[test]
    fn test_config_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.history_len, 20);
        assert!(config.validate().is_ok());

        assert!(matches!(
            EngineConfig::new(0).validate(),
            Err(Error::InvalidConfig(_))
        ));
    }
}
