use nalgebra as na;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::track::Track;
use crate::TrackId;

pub const DEFAULT_HISTORY_LEN: usize = 20;

/// Per-track-id trajectory history for the objects the tracker currently
/// reports. Entries for ids that disappear are dropped by [`TrackStore::prune`].
#[derive(Debug)]
pub struct TrackStore {
    tracks: HashMap<TrackId, Track>,
    history_len: usize,
}

impl TrackStore {
    pub fn new() -> Self {
        Self::with_history_len(DEFAULT_HISTORY_LEN)
    }

    /// `history_len` is checked by [`crate::EngineConfig::validate`].
    pub(crate) fn with_history_len(history_len: usize) -> Self {
        Self {
            tracks: HashMap::with_capacity(64),
            history_len,
        }
    }

    #[inline]
    pub fn history_len(&self) -> usize {
        self.history_len
    }

    pub fn upsert(&mut self, id: TrackId, centroid: na::Point2<f32>, label: &str) {
        let history_len = self.history_len;

        self.tracks
            .entry(id)
            .or_insert_with(|| {
                debug!(track_id = id, "new track");
                Track::new(id, history_len)
            })
            .push(centroid, label);
    }

    /// Drops every track whose id is not in `active`. A dropped id that shows
    /// up again later starts with an empty history.
    pub fn prune(&mut self, active: &HashSet<TrackId>) {
        let before = self.tracks.len();
        self.tracks.retain(|id, _| active.contains(id));

        let removed = before - self.tracks.len();
        if removed > 0 {
            debug!(removed, remaining = self.tracks.len(), "pruned tracks");
        }
    }

    #[inline]
    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(&id)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: TrackId) -> Option<&mut Track> {
        self.tracks.get_mut(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }
}

impl Default for TrackStore {
    fn default() -> Self {
        Self::new()
    }
}
