use nalgebra as na;
use std::collections::HashSet;

use crate::circular_queue::CircularQueue;
use crate::line::LineId;
use crate::TrackId;

#[derive(Debug, Clone)]
struct Observation {
    position: na::Point2<f32>,
    label: String,
}

/// Rolling history of one live tracked object.
///
/// Positions and labels are stored as pairs, so both sequences always have
/// the same length and are evicted together.
#[derive(Debug, Clone)]
pub struct Track {
    id: TrackId,
    history: CircularQueue<Observation>,
    counted_lines: HashSet<LineId>,
}

impl Track {
    pub(crate) fn new(id: TrackId, history_len: usize) -> Self {
        Self {
            id,
            history: CircularQueue::with_capacity(history_len),
            counted_lines: HashSet::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> TrackId {
        self.id
    }

    pub(crate) fn push(&mut self, position: na::Point2<f32>, label: impl Into<String>) {
        self.history.push(Observation {
            position,
            label: label.into(),
        });
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Centroids, oldest first.
    #[inline]
    pub fn positions(&self) -> impl Iterator<Item = na::Point2<f32>> + '_ {
        self.history.iter().map(|o| o.position)
    }

    /// Class labels, index-aligned with [`Track::positions`].
    #[inline]
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.history.iter().map(|o| o.label.as_str())
    }

    pub fn trajectory(&self) -> Vec<na::Point2<f32>> {
        self.positions().collect()
    }

    /// Vector from the oldest retained position to the newest one.
    pub fn heading(&self) -> Option<na::Vector2<f32>> {
        let first = self.history.oldest()?.position;
        let last = self.history.newest()?.position;

        Some(last - first)
    }

    /// Most frequent label in the retained window. On a tie the label that
    /// appears first in the window wins.
    pub fn majority_label(&self) -> Option<&str> {
        let mut votes: Vec<(&str, usize)> = Vec::new();

        for label in self.labels() {
            match votes.iter_mut().find(|(l, _)| *l == label) {
                Some((_, n)) => *n += 1,
                None => votes.push((label, 1)),
            }
        }

        let mut best: Option<(&str, usize)> = None;
        for (label, n) in votes {
            if best.map_or(true, |(_, m)| n > m) {
                best = Some((label, n));
            }
        }

        best.map(|(label, _)| label)
    }

    #[inline]
    pub fn is_counted(&self, line: &LineId) -> bool {
        self.counted_lines.contains(line)
    }

    /// Returns `false` if the line was already credited.
    #[inline]
    pub(crate) fn mark_counted(&mut self, line: &LineId) -> bool {
        self.counted_lines.insert(line.clone())
    }

    pub fn counted_lines(&self) -> impl Iterator<Item = &LineId> {
        self.counted_lines.iter()
    }
}
