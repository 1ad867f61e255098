//! Backend-neutral drawing primitives produced by the node and edge renderers.
//! Painting them is `render`'s job; everything here is plain comparable data.

use super::geometry::{Point, Rect};

#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
	pub color: String,
	pub width: f64,
	/// `[dash, gap]`; `None` draws a solid line.
	pub dash: Option<[f64; 2]>,
}

impl Stroke {
	pub fn solid(color: impl Into<String>, width: f64) -> Self {
		Self {
			color: color.into(),
			width,
			dash: None,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Shadow {
	pub color: String,
	pub blur: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
	Left,
	Center,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
	pub font: String,
	pub color: String,
	pub align: TextAlign,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
	/// `rotation` is in radians about the rect's center.
	Rect {
		rect: Rect,
		radius: f64,
		rotation: f64,
		fill: Option<String>,
		stroke: Option<Stroke>,
	},
	/// `radius` is 0 for sharp corners; only the top two corners are rounded.
	TopRoundedRect {
		rect: Rect,
		radius: f64,
		fill: String,
	},
	Ellipse {
		center: Point,
		rx: f64,
		ry: f64,
		fill: Option<String>,
		stroke: Option<Stroke>,
	},
	Line {
		from: Point,
		to: Point,
		stroke: Stroke,
	},
	Circle {
		center: Point,
		radius: f64,
		fill: String,
	},
	/// Single line of text, vertically centered on `at`, clipped to `max_width`.
	Text {
		text: String,
		at: Point,
		max_width: f64,
		style: TextStyle,
	},
}
