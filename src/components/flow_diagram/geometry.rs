use serde::{Deserialize, Serialize};

/// A position in diagram space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn offset(self, dx: f64, dy: f64) -> Self {
		Self::new(self.x + dx, self.y + dy)
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl Rect {
	pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
		Self {
			x,
			y,
			width,
			height,
		}
	}

	pub fn right(&self) -> f64 {
		self.x + self.width
	}

	pub fn bottom(&self) -> f64 {
		self.y + self.height
	}

	pub fn center(&self) -> Point {
		Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
	}

	pub fn contains(&self, p: Point) -> bool {
		p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
	}

	/// True when `other` lies entirely inside `self` (edges included).
	pub fn contains_rect(&self, other: &Rect) -> bool {
		const EPS: f64 = 1e-6;
		other.x >= self.x - EPS
			&& other.y >= self.y - EPS
			&& other.right() <= self.right() + EPS
			&& other.bottom() <= self.bottom() + EPS
	}

	pub fn intersects(&self, other: &Rect) -> bool {
		self.x <= other.right()
			&& other.x <= self.right()
			&& self.y <= other.bottom()
			&& other.y <= self.bottom()
	}

	/// Grown by `margin` on every side.
	pub fn inflate(&self, margin: f64) -> Rect {
		Rect::new(
			self.x - margin,
			self.y - margin,
			self.width + 2.0 * margin,
			self.height + 2.0 * margin,
		)
	}

	pub fn union(&self, other: &Rect) -> Rect {
		let (x, y) = (self.x.min(other.x), self.y.min(other.y));
		Rect::new(
			x,
			y,
			self.right().max(other.right()) - x,
			self.bottom().max(other.bottom()) - y,
		)
	}

	/// Smallest rect covering every rect in `rects`, `None` for an empty input.
	pub fn bounding<'a>(rects: impl IntoIterator<Item = &'a Rect>) -> Option<Rect> {
		rects.into_iter().fold(None, |acc, r| match acc {
			None => Some(*r),
			Some(b) => Some(b.union(r)),
		})
	}

	/// The point on this rect's border facing `side`, centered along that side.
	pub fn anchor(&self, side: Side) -> Point {
		match side {
			Side::Top => Point::new(self.x + self.width / 2.0, self.y),
			Side::Bottom => Point::new(self.x + self.width / 2.0, self.bottom()),
			Side::Left => Point::new(self.x, self.y + self.height / 2.0),
			Side::Right => Point::new(self.right(), self.y + self.height / 2.0),
		}
	}
}

/// Side of a node a connection anchor sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
	Top,
	Bottom,
	Left,
	Right,
}

/// Clamp range for the camera scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomLimits {
	pub min: f64,
	pub max: f64,
}

impl Default for ZoomLimits {
	fn default() -> Self {
		Self { min: 0.2, max: 2.0 }
	}
}

impl ZoomLimits {
	pub fn clamp(&self, k: f64) -> f64 {
		k.clamp(self.min, self.max)
	}
}

/// Camera: screen = graph * k + (x, y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		Point::new((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	pub fn graph_to_screen(&self, p: Point) -> (f64, f64) {
		(p.x * self.k + self.x, p.y * self.k + self.y)
	}

	/// The part of diagram space visible in a `width` x `height` viewport.
	pub fn visible_rect(&self, width: f64, height: f64) -> Rect {
		let origin = self.screen_to_graph(0.0, 0.0);
		Rect::new(origin.x, origin.y, width / self.k, height / self.k)
	}

	/// Scale by `factor` keeping the graph point under `(sx, sy)` fixed on screen.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64, limits: ZoomLimits) {
		let new_k = limits.clamp(self.k * factor);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}

	/// Camera framing `bounds` centered in the viewport, with `padding` as a
	/// fraction of the bounds' size added on every side.
	pub fn fit(bounds: &Rect, width: f64, height: f64, padding: f64, limits: ZoomLimits) -> Self {
		let padded_w = (bounds.width * (1.0 + 2.0 * padding)).max(1.0);
		let padded_h = (bounds.height * (1.0 + 2.0 * padding)).max(1.0);
		let k = limits.clamp((width / padded_w).min(height / padded_h));
		let center = bounds.center();
		Self {
			x: width / 2.0 - center.x * k,
			y: height / 2.0 - center.y * k,
			k,
		}
	}
}

/// Cubic bezier segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bezier {
	pub from: Point,
	pub c1: Point,
	pub c2: Point,
	pub to: Point,
}

impl Bezier {
	pub fn point_at(&self, t: f64) -> Point {
		let mt = 1.0 - t;
		let (a, b, c, d) = (mt * mt * mt, 3.0 * mt * mt * t, 3.0 * mt * t * t, t * t * t);
		Point::new(
			a * self.from.x + b * self.c1.x + c * self.c2.x + d * self.to.x,
			a * self.from.y + b * self.c1.y + c * self.c2.y + d * self.to.y,
		)
	}

	pub fn midpoint(&self) -> Point {
		self.point_at(0.5)
	}
}

const CURVATURE: f64 = 0.25;

fn control_offset(distance: f64) -> f64 {
	if distance >= 0.0 {
		0.5 * distance
	} else {
		CURVATURE * 25.0 * (-distance).sqrt()
	}
}

fn control_point(anchor: Point, side: Side, other: Point) -> Point {
	match side {
		Side::Top => anchor.offset(0.0, -control_offset(anchor.y - other.y)),
		Side::Bottom => anchor.offset(0.0, control_offset(other.y - anchor.y)),
		Side::Left => anchor.offset(-control_offset(anchor.x - other.x), 0.0),
		Side::Right => anchor.offset(control_offset(other.x - anchor.x), 0.0),
	}
}

/// Curve leaving `from` through `from_side` and entering `to` through `to_side`.
/// Control points push out along each side's normal, further the longer the
/// run, so the curve always leaves and enters perpendicular to the node edge.
pub fn bezier_between(from: Point, from_side: Side, to: Point, to_side: Side) -> Bezier {
	Bezier {
		from,
		c1: control_point(from, from_side, to),
		c2: control_point(to, to_side, from),
		to,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zoom_is_clamped_and_anchored() {
		let limits = ZoomLimits::default();
		let mut t = ViewTransform::default();
		let before = t.screen_to_graph(100.0, 50.0);
		for _ in 0..50 {
			t.zoom_at(100.0, 50.0, 1.5, limits);
		}
		assert_eq!(t.k, 2.0);
		let after = t.screen_to_graph(100.0, 50.0);
		assert!((before.x - after.x).abs() < 1e-9 && (before.y - after.y).abs() < 1e-9);

		for _ in 0..50 {
			t.zoom_at(0.0, 0.0, 0.5, limits);
		}
		assert_eq!(t.k, 0.2);
	}

	#[test]
	fn fit_contains_bounds() {
		let bounds = Rect::new(-300.0, 40.0, 900.0, 250.0);
		let t = ViewTransform::fit(&bounds, 800.0, 520.0, 0.15, ZoomLimits::default());
		assert!(t.visible_rect(800.0, 520.0).contains_rect(&bounds));
	}

	#[test]
	fn fit_of_tiny_graph_stops_at_max_zoom() {
		let bounds = Rect::new(0.0, 0.0, 10.0, 10.0);
		let t = ViewTransform::fit(&bounds, 800.0, 520.0, 0.15, ZoomLimits::default());
		assert_eq!(t.k, 2.0);
		assert!(t.visible_rect(800.0, 520.0).contains_rect(&bounds));
	}

	#[test]
	fn curve_leaves_bottom_and_enters_top() {
		let b = bezier_between(
			Point::new(0.0, 0.0),
			Side::Bottom,
			Point::new(100.0, 200.0),
			Side::Top,
		);
		assert_eq!(b.c1, Point::new(0.0, 100.0));
		assert_eq!(b.c2, Point::new(100.0, 100.0));
		assert_eq!(b.midpoint(), Point::new(50.0, 100.0));
	}

	#[test]
	fn backwards_curve_still_bulges_outward() {
		let b = bezier_between(
			Point::new(0.0, 100.0),
			Side::Bottom,
			Point::new(0.0, 0.0),
			Side::Top,
		);
		assert!(b.c1.y > 100.0);
		assert!(b.c2.y < 0.0);
	}

	#[test]
	fn touching_rects_intersect() {
		let a = Rect::new(0.0, 0.0, 10.0, 10.0);
		assert!(a.intersects(&Rect::new(10.0, 5.0, 4.0, 4.0)));
		assert!(!a.intersects(&Rect::new(10.5, 5.0, 4.0, 4.0)));
		assert!(a.inflate(1.0).intersects(&Rect::new(10.5, 5.0, 4.0, 4.0)));
		assert_eq!(a.inflate(2.0), Rect::new(-2.0, -2.0, 14.0, 14.0));
	}

	#[test]
	fn bounding_of_nothing_is_none() {
		assert_eq!(Rect::bounding(&[]), None);
		let r = Rect::bounding(&[Rect::new(0.0, 0.0, 1.0, 1.0), Rect::new(5.0, -2.0, 1.0, 1.0)]);
		assert_eq!(r, Some(Rect::new(0.0, -2.0, 6.0, 3.0)));
	}
}
