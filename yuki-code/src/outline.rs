//! Outline transforms and recording

use kurbo::{BezPath, PathEl, Point};
use skrifa::outline::OutlinePen;

use crate::profile::{Rounding, ScaleOffset};

/// Scale and translate every point of `path`, rounding to integers.
///
/// Each coordinate becomes `round(value * scale + offset)`; `offset_x`
/// applies to x and `offset_y` to y. Element kinds are unchanged.
pub fn transform_path(path: &BezPath, transform: ScaleOffset, rounding: Rounding) -> BezPath {
    let map = |pt: Point| {
        Point::new(
            rounding.round(pt.x * transform.scale_x + transform.offset_x),
            rounding.round(pt.y * transform.scale_y + transform.offset_y),
        )
    };
    path.elements()
        .iter()
        .map(|el| match *el {
            PathEl::MoveTo(p0) => PathEl::MoveTo(map(p0)),
            PathEl::LineTo(p0) => PathEl::LineTo(map(p0)),
            PathEl::QuadTo(p0, p1) => PathEl::QuadTo(map(p0), map(p1)),
            PathEl::CurveTo(p0, p1, p2) => PathEl::CurveTo(map(p0), map(p1), map(p2)),
            PathEl::ClosePath => PathEl::ClosePath,
        })
        .collect()
}

/// A pen that records a source outline as a [`BezPath`].
#[derive(Clone, Debug, Default)]
pub struct PathRecorder(BezPath);

impl PathRecorder {
    pub fn into_path(self) -> BezPath {
        self.0
    }
}

impl OutlinePen for PathRecorder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to((x as f64, y as f64));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to((x as f64, y as f64));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.0.quad_to((cx0 as f64, cy0 as f64), (x as f64, y as f64));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.0.curve_to(
            (cx0 as f64, cy0 as f64),
            (cx1 as f64, cy1 as f64),
            (x as f64, y as f64),
        );
    }

    fn close(&mut self) {
        self.0.close_path();
    }
}
