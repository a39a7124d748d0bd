//! Planar predicates for trajectory/line tests.
//!
//! Everything is evaluated in `f64` with closed intervals: touching at an
//! endpoint and collinear overlap both count as an intersection.

use nalgebra as na;

use crate::crossing::Direction;

#[inline]
fn to_f64(p: na::Point2<f32>) -> na::Point2<f64> {
    na::Point2::new(p.x as f64, p.y as f64)
}

/// 2D cross product `a.x * b.y - a.y * b.x`.
#[inline]
pub fn cross(a: na::Vector2<f32>, b: na::Vector2<f32>) -> f64 {
    let a = na::Vector2::new(a.x as f64, a.y as f64);
    let b = na::Vector2::new(b.x as f64, b.y as f64);

    a.perp(&b)
}

/// Sign of the turn `a -> b -> c`: positive counter-clockwise, negative
/// clockwise, zero collinear.
#[inline]
fn orientation(a: na::Point2<f64>, b: na::Point2<f64>, c: na::Point2<f64>) -> f64 {
    (b - a).perp(&(c - a))
}

/// `p` is known to be collinear with `a`-`b`; checks it lies within the
/// segment's bounding box.
#[inline]
fn on_segment(a: na::Point2<f64>, b: na::Point2<f64>, p: na::Point2<f64>) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

pub fn segments_intersect(
    p1: na::Point2<f32>,
    p2: na::Point2<f32>,
    q1: na::Point2<f32>,
    q2: na::Point2<f32>,
) -> bool {
    let (p1, p2, q1, q2) = (to_f64(p1), to_f64(p2), to_f64(q1), to_f64(q2));

    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}

#[derive(Debug, Clone, Copy)]
struct Envelope {
    min: na::Point2<f32>,
    max: na::Point2<f32>,
}

impl Envelope {
    fn of(points: &[na::Point2<f32>]) -> Option<Self> {
        let first = *points.first()?;

        Some(points.iter().fold(
            Envelope {
                min: first,
                max: first,
            },
            |env, p| Envelope {
                min: na::Point2::new(env.min.x.min(p.x), env.min.y.min(p.y)),
                max: na::Point2::new(env.max.x.max(p.x), env.max.y.max(p.y)),
            },
        ))
    }

    #[inline]
    fn overlaps(&self, other: &Envelope) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

/// True if any segment of `a` touches any segment of `b`. Both polylines
/// need at least two vertices, otherwise the result is `false`.
pub fn polylines_intersect(a: &[na::Point2<f32>], b: &[na::Point2<f32>]) -> bool {
    if a.len() < 2 || b.len() < 2 {
        return false;
    }

    match (Envelope::of(a), Envelope::of(b)) {
        (Some(ea), Some(eb)) if ea.overlaps(&eb) => {}
        _ => return false,
    }

    a.windows(2).any(|sa| {
        b.windows(2)
            .any(|sb| segments_intersect(sa[0], sa[1], sb[0], sb[1]))
    })
}

/// Coarse heading of a trajectory relative to the way the line was drawn.
/// `heading` runs from the oldest to the newest trajectory point.
pub fn direction(line: (na::Point2<f32>, na::Point2<f32>), heading: na::Vector2<f32>) -> Direction {
    Direction::from_cross(cross(line.1 - line.0, heading))
}
