//! Optional rendering of boxes, trails and counting lines onto RGB frames.
//!
//! Purely cosmetic: nothing here feeds back into crossing evaluation.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use nalgebra as na;
use serde_derive::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;
use crate::frame::Frame;
use crate::line::Line;
use crate::track_store::TrackStore;

pub const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const TRAIL_COLOR: Rgb<u8> = Rgb([250, 250, 0]);

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VizMode {
    Boxes,
    Trails,
    #[default]
    Both,
}

impl VizMode {
    #[inline]
    pub fn boxes(&self) -> bool {
        matches!(self, VizMode::Boxes | VizMode::Both)
    }

    #[inline]
    pub fn trails(&self) -> bool {
        matches!(self, VizMode::Trails | VizMode::Both)
    }
}

/// Selector index as shown in a combo box: 0 boxes, 1 trails, 2 both.
impl TryFrom<u8> for VizMode {
    type Error = Error;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(VizMode::Boxes),
            1 => Ok(VizMode::Trails),
            2 => Ok(VizMode::Both),
            _ => Err(Error::InvalidConfig(format!("unknown viz mode {}", index))),
        }
    }
}

impl FromStr for VizMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "boxes" | "0" => Ok(VizMode::Boxes),
            "trails" | "1" => Ok(VizMode::Trails),
            "both" | "2" => Ok(VizMode::Both),
            other => Err(Error::InvalidConfig(format!("unknown viz mode {:?}", other))),
        }
    }
}

fn draw_polyline(image: &mut RgbImage, points: &[na::Point2<f32>], color: Rgb<u8>) {
    for seg in points.windows(2) {
        draw_line_segment_mut(image, (seg[0].x, seg[0].y), (seg[1].x, seg[1].y), color);
    }
}

pub fn draw_lines(image: &mut RgbImage, lines: &[Line]) {
    for line in lines {
        draw_polyline(image, &line.geometry, Rgb(line.color));
    }
}

pub fn draw_boxes(image: &mut RgbImage, frame: &Frame) {
    for det in frame.iter().filter(|d| d.bbox.is_valid()) {
        let ltwh = det.bbox.as_ltwh();
        let w = ltwh.width().round().max(1.0) as u32;
        let h = ltwh.height().round().max(1.0) as u32;
        let rect = Rect::at(ltwh.left().round() as i32, ltwh.top().round() as i32).of_size(w, h);

        draw_hollow_rect_mut(image, rect, BOX_COLOR);
    }
}

/// Draws the retained trajectory of every track present in `frame`.
pub fn draw_trails(image: &mut RgbImage, frame: &Frame, store: &TrackStore) {
    for id in frame.iter().filter_map(|d| d.track_id) {
        if let Some(track) = store.get(id) {
            draw_polyline(image, &track.trajectory(), TRAIL_COLOR);
        }
    }
}

pub fn draw(image: &mut RgbImage, mode: VizMode, frame: &Frame, lines: &[Line], store: &TrackStore) {
    draw_lines(image, lines);

    if mode.boxes() {
        draw_boxes(image, frame);
    }

    if mode.trails() {
        draw_trails(image, frame, store);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BBox;
    use crate::detection::Detection;

    #[test]
    fn test_mode_from_index_and_name() {
        assert_eq!(VizMode::try_from(0u8).unwrap(), VizMode::Boxes);
        assert_eq!(VizMode::try_from(2u8).unwrap(), VizMode::Both);
        assert!(VizMode::try_from(3u8).is_err());
        assert_eq!("Trails".parse::<VizMode>().unwrap(), VizMode::Trails);
        assert!("stripes".parse::<VizMode>().is_err());
    }

    #[test]
    fn test_mode_flags() {
        assert!(VizMode::Boxes.boxes() && !VizMode::Boxes.trails());
        assert!(!VizMode::Trails.boxes() && VizMode::Trails.trails());
        assert!(VizMode::Both.boxes() && VizMode::Both.trails());
    }

    #[test]
    fn test_draw_box_outline() {
        let mut image = RgbImage::new(20, 20);
        let frame = Frame::new("", vec![Detection::new(1, "car", BBox::ltrb(2.0, 2.0, 10.0, 10.0))]);

        draw_boxes(&mut image, &frame);

        assert_eq!(*image.get_pixel(2, 2), BOX_COLOR);
        assert_eq!(*image.get_pixel(5, 5), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_draw_trails_only_for_present_tracks() {
        let mut store = TrackStore::new();
        store.upsert(1, na::Point2::new(0.0, 5.0), "car");
        store.upsert(1, na::Point2::new(19.0, 5.0), "car");
        store.upsert(2, na::Point2::new(5.0, 0.0), "car");
        store.upsert(2, na::Point2::new(5.0, 19.0), "car");

        let frame = Frame::new("", vec![Detection::new(1, "car", BBox::ltrb(18.0, 4.0, 20.0, 6.0))]);
        let mut image = RgbImage::new(20, 20);
        draw_trails(&mut image, &frame, &store);

        assert_eq!(*image.get_pixel(10, 5), TRAIL_COLOR);
        assert_eq!(*image.get_pixel(5, 12), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_draw_lines_uses_line_color() {
        let mut image = RgbImage::new(10, 10);
        let line = Line::new("a", &[(0.0, 3.0), (9.0, 3.0)]).with_color([255, 0, 0]);

        draw_lines(&mut image, &[line]);

        assert_eq!(*image.get_pixel(4, 3), Rgb([255, 0, 0]));
    }
}
