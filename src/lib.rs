pub mod bbox;
pub mod crossing;
pub mod detection;
pub mod detector;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod line;
pub mod overlay;
pub mod pipeline;
pub mod report;
pub mod timecode;
pub mod track_store;

mod circular_queue;
mod track;

pub use crossing::{CrossingEngine, CrossingEvent, Direction, EngineConfig};
pub use detection::Detection;
pub use error::Error;
pub use frame::Frame;
pub use line::{Line, LineId};
pub use track::Track;
pub use track_store::TrackStore;

/// Identity assigned by the upstream tracker.
pub type TrackId = i64;

/// Receives crossing events synchronously, in the order they are detected.
pub trait CrossingSink {
    fn on_crossing(&mut self, event: CrossingEvent);
}

impl<F> CrossingSink for F
where
    F: FnMut(CrossingEvent),
{
    #[inline]
    fn on_crossing(&mut self, event: CrossingEvent) {
        self(event)
    }
}
