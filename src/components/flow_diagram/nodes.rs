//! Node renderers: one pure function per [`NodeShape`] variant.

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

use super::geometry::{Point, Rect};
use super::model::{
	CARD_BODY_HEIGHT, CARD_HEADER_HEIGHT, CardNode, DatabaseNode, DecisionNode, Node, NodeShape,
};
use super::scene::{Shadow, Shape, Stroke, TextAlign, TextStyle};
use super::theme::{Theme, with_alpha};

pub const DIMMED_OPACITY: f64 = 0.15;
pub const HANDLE_RADIUS: f64 = 3.5;
const CORNER_RADIUS: f64 = 8.0;
const TEXT_PADDING: f64 = 10.0;
const DATABASE_CAP_RY: f64 = 14.0;

/// Everything needed to paint one node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeVisual {
	pub bounds: Rect,
	/// Applied to every shape of the node.
	pub opacity: f64,
	/// Glow behind the outermost shape; absent while dimmed.
	pub shadow: Option<Shadow>,
	pub shapes: Vec<Shape>,
}

/// Render `node` with its top-left corner at `position`.
pub fn render_node(node: &Node, position: Point, dimmed: bool, theme: &Theme) -> NodeVisual {
	let bounds = node.bounds_at(position);
	let (mut shapes, color, blur) = match &node.shape {
		NodeShape::Card(card) => {
			let color = card.color.as_deref().unwrap_or(&theme.card_color);
			(card_shapes(card, color, bounds, theme), color, 16.0)
		}
		NodeShape::Decision(decision) => {
			let color = decision.color.as_deref().unwrap_or(&theme.decision_color);
			(decision_shapes(decision, color, bounds, theme), color, 12.0)
		}
		NodeShape::Database(db) => {
			let color = db.color.as_deref().unwrap_or(&theme.database_color);
			(database_shapes(db, color, bounds, theme), color, 12.0)
		}
	};
	shapes.extend(node.shape.handles().iter().map(|h| Shape::Circle {
		center: bounds.anchor(h.side),
		radius: HANDLE_RADIUS,
		fill: theme.handle.clone(),
	}));

	NodeVisual {
		bounds,
		opacity: if dimmed { DIMMED_OPACITY } else { 1.0 },
		shadow: (!dimmed).then(|| Shadow {
			color: with_alpha(color, 0.55),
			blur,
		}),
		shapes,
	}
}

fn label_style(theme: &Theme, size: f64) -> TextStyle {
	TextStyle {
		font: theme.font(600, size),
		color: theme.text.clone(),
		align: TextAlign::Center,
	}
}

fn muted_style(theme: &Theme) -> TextStyle {
	TextStyle {
		font: theme.font(400, 11.0),
		color: theme.text_muted.clone(),
		align: TextAlign::Center,
	}
}

fn card_shapes(card: &CardNode, color: &str, bounds: Rect, theme: &Theme) -> Vec<Shape> {
	let mut shapes = vec![Shape::Rect {
		rect: bounds,
		radius: CORNER_RADIUS,
		rotation: 0.0,
		fill: Some(theme.card_body.clone()),
		stroke: Some(Stroke::solid(color, 1.5)),
	}];
	let text_width = bounds.width - 2.0 * TEXT_PADDING;
	let mut body_top = bounds.y;

	if let Some(category) = &card.category {
		shapes.push(Shape::TopRoundedRect {
			rect: Rect::new(bounds.x, bounds.y, bounds.width, CARD_HEADER_HEIGHT),
			radius: CORNER_RADIUS,
			fill: color.to_string(),
		});
		shapes.push(Shape::Text {
			text: category.to_uppercase(),
			at: Point::new(bounds.x + TEXT_PADDING, bounds.y + CARD_HEADER_HEIGHT / 2.0),
			max_width: text_width,
			style: TextStyle {
				font: theme.font(700, 10.0),
				color: theme.header_text.clone(),
				align: TextAlign::Left,
			},
		});
		body_top += CARD_HEADER_HEIGHT;
	}

	let center_x = bounds.x + bounds.width / 2.0;
	let label_y = if card.description.is_some() {
		body_top + CARD_BODY_HEIGHT / 2.0 - 2.0
	} else {
		body_top + CARD_BODY_HEIGHT / 2.0
	};
	shapes.push(Shape::Text {
		text: card.label.clone(),
		at: Point::new(center_x, label_y),
		max_width: text_width,
		style: label_style(theme, 13.0),
	});
	if let Some(description) = &card.description {
		shapes.push(Shape::Text {
			text: description.clone(),
			at: Point::new(center_x, body_top + CARD_BODY_HEIGHT + 2.0),
			max_width: text_width,
			style: muted_style(theme),
		});
	}
	shapes
}

fn decision_shapes(decision: &DecisionNode, color: &str, bounds: Rect, theme: &Theme) -> Vec<Shape> {
	// A square whose diagonal spans the bounds becomes a diamond touching all
	// four anchors once rotated by 45 degrees.
	let side = bounds.width * FRAC_1_SQRT_2;
	let center = bounds.center();
	vec![
		Shape::Rect {
			rect: Rect::new(center.x - side / 2.0, center.y - side / 2.0, side, side),
			radius: 4.0,
			rotation: FRAC_PI_4,
			fill: Some(with_alpha(color, 0.18)),
			stroke: Some(Stroke::solid(color, 2.0)),
		},
		// Text is emitted unrotated, i.e. counter-rotated relative to the square.
		Shape::Text {
			text: decision.label.clone(),
			at: center,
			max_width: side,
			style: label_style(theme, 12.0),
		},
	]
}

fn database_shapes(db: &DatabaseNode, color: &str, bounds: Rect, theme: &Theme) -> Vec<Shape> {
	let ry = DATABASE_CAP_RY;
	let rx = bounds.width / 2.0;
	let center_x = bounds.x + rx;
	let (top_y, bottom_y) = (bounds.y + ry, bounds.bottom() - ry);
	let fill = Some(theme.card_body.clone());
	let stroke = Stroke::solid(color, 2.0);

	let mut shapes = vec![
		Shape::Ellipse {
			center: Point::new(center_x, bottom_y),
			rx,
			ry,
			fill: fill.clone(),
			stroke: Some(stroke.clone()),
		},
		Shape::Rect {
			rect: Rect::new(bounds.x, top_y, bounds.width, bottom_y - top_y),
			radius: 0.0,
			rotation: 0.0,
			fill: fill.clone(),
			stroke: None,
		},
		Shape::Line {
			from: Point::new(bounds.x, top_y),
			to: Point::new(bounds.x, bottom_y),
			stroke: stroke.clone(),
		},
		Shape::Line {
			from: Point::new(bounds.right(), top_y),
			to: Point::new(bounds.right(), bottom_y),
			stroke: stroke.clone(),
		},
		Shape::Ellipse {
			center: Point::new(center_x, top_y),
			rx,
			ry,
			fill: Some(with_alpha(color, 0.35)),
			stroke: Some(stroke),
		},
	];

	let body_mid = (top_y + ry + bottom_y) / 2.0;
	let text_width = bounds.width - 2.0 * TEXT_PADDING;
	let label_y = if db.description.is_some() {
		body_mid - 8.0
	} else {
		body_mid
	};
	shapes.push(Shape::Text {
		text: db.label.clone(),
		at: Point::new(center_x, label_y),
		max_width: text_width,
		style: label_style(theme, 13.0),
	});
	if let Some(description) = &db.description {
		shapes.push(Shape::Text {
			text: description.clone(),
			at: Point::new(center_x, body_mid + 10.0),
			max_width: text_width,
			style: muted_style(theme),
		});
	}
	shapes
}
