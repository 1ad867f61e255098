use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::geometry::{Point, Rect};
use super::nodes::NodeVisual;
use super::scene::{Shape, Stroke, TextAlign};
use super::state::{DiagramState, EdgeFrame, Frame};
use super::theme::Theme;

const GRID_DOT: f64 = 1.5;
/// Below this on-screen spacing the grid turns into noise; coarsen it.
const MIN_GRID_SPACING: f64 = 8.0;
/// Nodes this far outside the viewport may still cast a visible glow.
const CULL_MARGIN: f64 = 32.0;

pub fn render(state: &DiagramState, frame: &Frame, ctx: &CanvasRenderingContext2d) {
	let theme = state.theme();
	ctx.set_fill_style_str(&theme.background);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_grid(state, ctx);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	for edge in &frame.edges {
		draw_edge(edge, theme, ctx);
	}
	let visible = state
		.transform
		.visible_rect(state.width, state.height)
		.inflate(CULL_MARGIN / state.transform.k);
	for node in frame.nodes.iter().filter(|n| visible.intersects(&n.bounds)) {
		draw_node(node, ctx);
	}
	ctx.restore();

	draw_minimap(frame, theme, ctx);
}

fn draw_grid(state: &DiagramState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let mut gap = state.config().grid_gap;
	while gap * k < MIN_GRID_SPACING {
		gap *= 2.0;
	}
	let visible = state.transform.visible_rect(state.width, state.height);
	let (start_x, start_y) = (
		(visible.x / gap).floor() * gap,
		(visible.y / gap).floor() * gap,
	);

	ctx.set_fill_style_str(&state.theme().grid_dot);
	let mut gy = start_y;
	while gy <= visible.bottom() {
		let mut gx = start_x;
		while gx <= visible.right() {
			let (sx, sy) = state.transform.graph_to_screen(Point::new(gx, gy));
			ctx.fill_rect(sx - GRID_DOT / 2.0, sy - GRID_DOT / 2.0, GRID_DOT, GRID_DOT);
			gx += gap;
		}
		gy += gap;
	}
}

fn apply_stroke(stroke: &Stroke, ctx: &CanvasRenderingContext2d) {
	ctx.set_stroke_style_str(&stroke.color);
	ctx.set_line_width(stroke.width);
	let dash = match stroke.dash {
		Some([dash, gap]) => js_sys::Array::of2(&JsValue::from_f64(dash), &JsValue::from_f64(gap)),
		None => js_sys::Array::new(),
	};
	let _ = ctx.set_line_dash(&dash);
}

fn draw_edge(edge: &EdgeFrame, theme: &Theme, ctx: &CanvasRenderingContext2d) {
	let visual = &edge.visual;
	let path = &visual.path;
	ctx.set_global_alpha(visual.opacity);
	apply_stroke(&visual.stroke, ctx);
	ctx.set_line_dash_offset(edge.dash_offset);
	ctx.begin_path();
	ctx.move_to(path.from.x, path.from.y);
	ctx.bezier_curve_to(
		path.c1.x, path.c1.y, path.c2.x, path.c2.y, path.to.x, path.to.y,
	);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	if let Some(label) = &visual.label {
		rounded_rect_path(&label.pill, label.pill.height / 2.0, ctx);
		ctx.set_fill_style_str(&theme.label_pill);
		ctx.fill();
		ctx.set_stroke_style_str(&visual.stroke.color);
		ctx.set_line_width(1.0);
		ctx.stroke();
		let center = label.pill.center();
		ctx.set_fill_style_str(&label.style.color);
		ctx.set_font(&label.style.font);
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text(&label.text, center.x, center.y);
	}
	ctx.set_global_alpha(1.0);
}

fn draw_node(node: &NodeVisual, ctx: &CanvasRenderingContext2d) {
	ctx.set_global_alpha(node.opacity);
	for (i, shape) in node.shapes.iter().enumerate() {
		// Only the outermost shape casts the glow.
		match (&node.shadow, i) {
			(Some(shadow), 0) => {
				ctx.set_shadow_color(&shadow.color);
				ctx.set_shadow_blur(shadow.blur);
			}
			_ => {
				ctx.set_shadow_color("transparent");
				ctx.set_shadow_blur(0.0);
			}
		}
		draw_shape(shape, ctx);
	}
	ctx.set_shadow_color("transparent");
	ctx.set_shadow_blur(0.0);
	ctx.set_global_alpha(1.0);
}

fn draw_shape(shape: &Shape, ctx: &CanvasRenderingContext2d) {
	match shape {
		Shape::Rect {
			rect,
			radius,
			rotation,
			fill,
			stroke,
		} => {
			ctx.save();
			let center = rect.center();
			let _ = ctx.translate(center.x, center.y);
			let _ = ctx.rotate(*rotation);
			let local = Rect::new(-rect.width / 2.0, -rect.height / 2.0, rect.width, rect.height);
			rounded_rect_path(&local, *radius, ctx);
			fill_and_stroke(fill.as_deref(), stroke.as_ref(), ctx);
			ctx.restore();
		}
		Shape::TopRoundedRect { rect, radius, fill } => {
			let r = radius.min(rect.height / 2.0);
			ctx.begin_path();
			ctx.move_to(rect.x, rect.bottom());
			ctx.line_to(rect.x, rect.y + r);
			let _ = ctx.arc_to(rect.x, rect.y, rect.x + r, rect.y, r);
			ctx.line_to(rect.right() - r, rect.y);
			let _ = ctx.arc_to(rect.right(), rect.y, rect.right(), rect.y + r, r);
			ctx.line_to(rect.right(), rect.bottom());
			ctx.close_path();
			ctx.set_fill_style_str(fill);
			ctx.fill();
		}
		Shape::Ellipse {
			center,
			rx,
			ry,
			fill,
			stroke,
		} => {
			ctx.begin_path();
			let _ = ctx.ellipse(center.x, center.y, *rx, *ry, 0.0, 0.0, 2.0 * PI);
			fill_and_stroke(fill.as_deref(), stroke.as_ref(), ctx);
		}
		Shape::Line { from, to, stroke } => {
			apply_stroke(stroke, ctx);
			ctx.begin_path();
			ctx.move_to(from.x, from.y);
			ctx.line_to(to.x, to.y);
			ctx.stroke();
		}
		Shape::Circle {
			center,
			radius,
			fill,
		} => {
			ctx.begin_path();
			let _ = ctx.arc(center.x, center.y, *radius, 0.0, 2.0 * PI);
			ctx.set_fill_style_str(fill);
			ctx.fill();
		}
		Shape::Text {
			text,
			at,
			max_width,
			style,
		} => {
			ctx.set_fill_style_str(&style.color);
			ctx.set_font(&style.font);
			ctx.set_text_align(match style.align {
				TextAlign::Left => "left",
				TextAlign::Center => "center",
			});
			ctx.set_text_baseline("middle");
			let _ = ctx.fill_text_with_max_width(text, at.x, at.y, *max_width);
		}
	}
}

fn fill_and_stroke(fill: Option<&str>, stroke: Option<&Stroke>, ctx: &CanvasRenderingContext2d) {
	if let Some(fill) = fill {
		ctx.set_fill_style_str(fill);
		ctx.fill();
	}
	if let Some(stroke) = stroke {
		// The glow belongs to the fill; stroking again would double it.
		ctx.set_shadow_blur(0.0);
		apply_stroke(stroke, ctx);
		ctx.stroke();
	}
}

fn rounded_rect_path(rect: &Rect, radius: f64, ctx: &CanvasRenderingContext2d) {
	let r = radius.min(rect.width / 2.0).min(rect.height / 2.0);
	ctx.begin_path();
	ctx.move_to(rect.x + r, rect.y);
	let _ = ctx.arc_to(rect.right(), rect.y, rect.right(), rect.bottom(), r);
	let _ = ctx.arc_to(rect.right(), rect.bottom(), rect.x, rect.bottom(), r);
	let _ = ctx.arc_to(rect.x, rect.bottom(), rect.x, rect.y, r);
	let _ = ctx.arc_to(rect.x, rect.y, rect.right(), rect.y, r);
	ctx.close_path();
}

fn draw_minimap(frame: &Frame, theme: &Theme, ctx: &CanvasRenderingContext2d) {
	let minimap = &frame.minimap;
	let f = minimap.frame;
	ctx.set_fill_style_str(&theme.minimap_background);
	ctx.fill_rect(f.x, f.y, f.width, f.height);

	for glyph in &minimap.glyphs {
		ctx.set_fill_style_str(&glyph.color);
		ctx.fill_rect(glyph.rect.x, glyph.rect.y, glyph.rect.width, glyph.rect.height);
	}

	ctx.set_fill_style_str(&theme.minimap_mask);
	for r in &minimap.mask {
		ctx.fill_rect(r.x, r.y, r.width, r.height);
	}

	let v = minimap.viewport;
	ctx.set_stroke_style_str(&theme.accent);
	ctx.set_line_width(1.0);
	ctx.stroke_rect(v.x, v.y, v.width, v.height);
	ctx.set_stroke_style_str(&theme.card_border);
	ctx.stroke_rect(f.x, f.y, f.width, f.height);
}
