use serde_derive::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

use crate::crossing::{CrossingEvent, Direction};
use crate::error::Error;
use crate::line::LineId;
use crate::CrossingSink;

#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionCounts {
    pub forward: usize,
    pub backward: usize,
    pub indeterminate: usize,
}

impl DirectionCounts {
    fn bump(&mut self, direction: Direction) {
        match direction {
            Direction::Forward => self.forward += 1,
            Direction::Backward => self.backward += 1,
            Direction::Indeterminate => self.indeterminate += 1,
        }
    }

    pub fn get(&self, direction: Direction) -> usize {
        match direction {
            Direction::Forward => self.forward,
            Direction::Backward => self.backward,
            Direction::Indeterminate => self.indeterminate,
        }
    }

    pub fn total(&self) -> usize {
        self.forward + self.backward + self.indeterminate
    }
}

/// line -> vehicle class -> per-direction counts
pub type Tally = BTreeMap<LineId, BTreeMap<String, DirectionCounts>>;

#[derive(Serialize)]
struct Row<'a> {
    file: Option<&'a str>,
    #[serde(flatten)]
    event: &'a CrossingEvent,
}

/// Collects every crossing of a session together with the source it came
/// from, and keeps running counts.
#[derive(Debug, Default)]
pub struct CrossingReport {
    source: Option<String>,
    events: Vec<CrossingEvent>,
    tally: Tally,
}

impl CrossingReport {
    pub fn new(source: Option<String>) -> Self {
        Self {
            source,
            events: Vec::new(),
            tally: Tally::new(),
        }
    }

    #[inline]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn record(&mut self, event: CrossingEvent) {
        self.tally
            .entry(event.line_id.clone())
            .or_default()
            .entry(event.vehicle_class.clone())
            .or_default()
            .bump(event.direction);

        self.events.push(event);
    }

    #[inline]
    pub fn events(&self) -> &[CrossingEvent] {
        &self.events
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    pub fn count(&self, line: &LineId, class: &str, direction: Direction) -> usize {
        self.tally
            .get(line)
            .and_then(|classes| classes.get(class))
            .map_or(0, |counts| counts.get(direction))
    }

    /// Writes one JSON object per event: `file` followed by the event fields.
    pub fn write_json_lines<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        for event in &self.events {
            let row = Row {
                file: self.source(),
                event,
            };

            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;
        }

        writer.flush()?;

        Ok(())
    }
}

impl CrossingSink for CrossingReport {
    #[inline]
    fn on_crossing(&mut self, event: CrossingEvent) {
        self.record(event)
    }
}
