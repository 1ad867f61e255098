use super::geometry::{Point, Rect};
use super::theme::Theme;

#[derive(Clone, Debug, PartialEq)]
pub struct MinimapGlyph {
	pub rect: Rect,
	pub color: String,
}

/// The minimap in screen coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct MinimapLayout {
	pub frame: Rect,
	pub glyphs: Vec<MinimapGlyph>,
	/// Where the current viewport lands inside `frame`.
	pub viewport: Rect,
	/// Areas of `frame` outside the viewport, covered by the mask.
	pub mask: Vec<Rect>,
}

/// Project node bounds and the visible region into a minimap of `size`
/// anchored `margin` pixels from the bottom-right of the `width` x `height`
/// canvas. Each node carries the color it declared, if any.
pub fn layout_minimap<'a>(
	nodes: impl IntoIterator<Item = (Rect, Option<&'a str>)>,
	visible: Rect,
	canvas: (f64, f64),
	size: (f64, f64),
	margin: f64,
	theme: &Theme,
) -> MinimapLayout {
	let frame = Rect::new(
		canvas.0 - size.0 - margin,
		canvas.1 - size.1 - margin,
		size.0,
		size.1,
	);
	let nodes: Vec<_> = nodes.into_iter().collect();
	let world = nodes
		.iter()
		.fold(visible, |acc, (rect, _)| acc.union(rect));
	let scale = (frame.width / world.width.max(1.0)).min(frame.height / world.height.max(1.0));
	// Center the scaled world inside the frame.
	let origin = Point::new(
		frame.x + (frame.width - world.width * scale) / 2.0,
		frame.y + (frame.height - world.height * scale) / 2.0,
	);
	let project = |r: &Rect| {
		Rect::new(
			origin.x + (r.x - world.x) * scale,
			origin.y + (r.y - world.y) * scale,
			r.width * scale,
			r.height * scale,
		)
	};

	let glyphs = nodes
		.iter()
		.map(|(rect, color)| MinimapGlyph {
			rect: project(rect),
			color: color.unwrap_or(&theme.accent).to_string(),
		})
		.collect();
	let viewport = project(&visible);
	MinimapLayout {
		frame,
		glyphs,
		viewport,
		mask: mask_around(frame, viewport),
	}
}

/// Up to four rects tiling `frame` minus `hole`.
fn mask_around(frame: Rect, hole: Rect) -> Vec<Rect> {
	let top = hole.y.max(frame.y);
	let bottom = hole.bottom().min(frame.bottom());
	let left = hole.x.max(frame.x);
	let right = hole.right().min(frame.right());
	[
		Rect::new(frame.x, frame.y, frame.width, top - frame.y),
		Rect::new(frame.x, bottom, frame.width, frame.bottom() - bottom),
		Rect::new(frame.x, top, left - frame.x, bottom - top),
		Rect::new(right, top, frame.right() - right, bottom - top),
	]
	.into_iter()
	.filter(|r| r.width > 0.0 && r.height > 0.0)
	.collect()
}
