use nalgebra as na;
use serde_derive::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::Error;

pub const DEFAULT_LINE_COLOR: [u8; 3] = [0, 255, 0];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct LineId(pub String);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LineId {
    fn from(s: &str) -> Self {
        LineId(s.to_string())
    }
}

impl From<String> for LineId {
    fn from(s: String) -> Self {
        LineId(s)
    }
}

/// A user-drawn counting line, in frame pixel coordinates.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(from = "LineDef", into = "LineDef")]
pub struct Line {
    pub id: LineId,
    pub geometry: Vec<na::Point2<f32>>,
    pub color: [u8; 3],
}

#[derive(Serialize, Deserialize)]
struct LineDef {
    id: LineId,
    geometry: Vec<(f32, f32)>,
    #[serde(default = "default_color")]
    color: [u8; 3],
}

fn default_color() -> [u8; 3] {
    DEFAULT_LINE_COLOR
}

impl From<LineDef> for Line {
    fn from(def: LineDef) -> Self {
        Line {
            id: def.id,
            geometry: def
                .geometry
                .into_iter()
                .map(|(x, y)| na::Point2::new(x, y))
                .collect(),
            color: def.color,
        }
    }
}

impl From<Line> for LineDef {
    fn from(line: Line) -> Self {
        LineDef {
            id: line.id,
            geometry: line.geometry.iter().map(|p| (p.x, p.y)).collect(),
            color: line.color,
        }
    }
}

impl Line {
    pub fn new(id: impl Into<LineId>, points: &[(f32, f32)]) -> Self {
        Self {
            id: id.into(),
            geometry: points.iter().map(|&(x, y)| na::Point2::new(x, y)).collect(),
            color: DEFAULT_LINE_COLOR,
        }
    }

    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.geometry.len() < 2 {
            return Err(Error::InvalidLineGeometry {
                line: self.id.clone(),
                points: self.geometry.len(),
            });
        }

        if self
            .geometry
            .iter()
            .any(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(Error::NonFiniteLinePoint {
                line: self.id.clone(),
            });
        }

        Ok(())
    }

    /// First and last vertex, the polyline's drawing direction.
    #[inline]
    pub fn endpoints(&self) -> Option<(na::Point2<f32>, na::Point2<f32>)> {
        Some((*self.geometry.first()?, *self.geometry.last()?))
    }
}

/// Checks a per-frame snapshot of lines before anything is evaluated against it.
pub fn validate_lines(lines: &[Line]) -> Result<(), Error> {
    let mut seen = HashSet::with_capacity(lines.len());

    for line in lines {
        line.validate()?;

        if !seen.insert(&line.id) {
            return Err(Error::DuplicateLineId(line.id.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_point_line_is_rejected() {
        let line = Line::new("a", &[(0.0, 0.0)]);

        assert!(matches!(
            line.validate(),
            Err(Error::InvalidLineGeometry { points: 1, .. })
        ));
    }

    #[test]
    fn test_non_finite_point_is_rejected() {
        let line = Line::new("a", &[(0.0, 0.0), (f32::NAN, 1.0)]);
        assert!(matches!(
            line.validate(),
            Err(Error::NonFiniteLinePoint { .. })
        ));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let lines = [
            Line::new("a", &[(0.0, 0.0), (1.0, 1.0)]),
            Line::new("a", &[(2.0, 0.0), (3.0, 1.0)]),
        ];

        assert!(matches!(
            validate_lines(&lines),
            Err(Error::DuplicateLineId(id)) if id == LineId::from("a")
        ));
    }

    #[test]
    fn test_polyline_endpoints() {
        let line = Line::new("a", &[(0.0, 0.0), (5.0, 5.0), (10.0, 0.0)]);
        let (first, last) = line.endpoints().unwrap();

        assert_eq!((first.x, first.y), (0.0, 0.0));
        assert_eq!((last.x, last.y), (10.0, 0.0));
    }

    #[test]
    fn test_deserialize_line() {
        let line: Line =
            serde_json::from_str(r#"{"id": "gate", "geometry": [[0, 10], [10, 0]]}"#).unwrap();

        assert_eq!(line.id, LineId::from("gate"));
        assert_eq!(line.geometry.len(), 2);
        assert_eq!(line.color, DEFAULT_LINE_COLOR);
    }
}
