use serde_derive::{Deserialize, Serialize};

use crate::bbox::{BBox, Ltrb};
use crate::error::Error;
use crate::TrackId;

/// One tracked object reported by the detector for a single frame.
///
/// `track_id` is absent when the tracker could not assign an identity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Detection {
    #[serde(rename = "id", default)]
    pub track_id: Option<TrackId>,
    pub label: String,
    #[serde(rename = "box")]
    pub bbox: BBox<Ltrb>,
}

impl Detection {
    pub fn new(track_id: TrackId, label: impl Into<String>, bbox: BBox<Ltrb>) -> Self {
        Self {
            track_id: Some(track_id),
            label: label.into(),
            bbox,
        }
    }

    /// Returns the track id when the detection can be fed into the trajectory
    /// history, `MalformedDetection` otherwise.
    pub fn checked_id(&self, index: usize) -> Result<TrackId, Error> {
        let id = self.track_id.ok_or(Error::MalformedDetection {
            index,
            reason: "missing track id",
        })?;

        if !self.bbox.is_valid() {
            return Err(Error::MalformedDetection {
                index,
                reason: "degenerate bounding box",
            });
        }

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_id() {
        let det = Detection::new(7, "car", BBox::ltrb(0.0, 0.0, 4.0, 4.0));
        assert_eq!(det.checked_id(0).unwrap(), 7);

        let mut no_id = det.clone();
        no_id.track_id = None;
        assert!(matches!(
            no_id.checked_id(3),
            Err(Error::MalformedDetection { index: 3, .. })
        ));

        let flat = Detection::new(7, "car", BBox::ltrb(0.0, 2.0, 4.0, 2.0));
        assert!(flat.checked_id(0).is_err());
    }

    #[test]
    fn test_deserialize_without_id() {
        let det: Detection =
            serde_json::from_str(r#"{"label": "bus", "box": [0, 0, 10, 10]}"#).unwrap();

        assert_eq!(det.track_id, None);
        assert_eq!(det.label, "bus");
    }
}
