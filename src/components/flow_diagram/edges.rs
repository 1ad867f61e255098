use super::geometry::{Bezier, Point, Rect, bezier_between};
use super::model::Edge;
use super::scene::{Stroke, TextAlign, TextStyle};
use super::theme::Theme;

pub const EDGE_WIDTH: f64 = 2.0;
pub const DIMMED_EDGE_OPACITY: f64 = 0.1;
pub const DASH: [f64; 2] = [6.0, 4.0];
/// One full dash cycle per period.
pub const DASH_PERIOD_SECS: f64 = 0.8;
const LABEL_CHAR_WIDTH: f64 = 6.5;
const LABEL_HEIGHT: f64 = 20.0;

/// Marching-dash animation owned by a single edge.
#[derive(Clone, Debug, PartialEq)]
pub struct DashAnimation {
	/// Derived from the edge id; keys the edge's own clock.
	pub name: String,
	pub period: f64,
}

impl DashAnimation {
	pub fn for_edge(edge_id: &str) -> Self {
		Self {
			name: format!("edge-dash-{edge_id}"),
			period: DASH_PERIOD_SECS,
		}
	}

	/// Dash offset after `elapsed` seconds on this animation's clock. Negative
	/// so the dashes travel from source to target.
	pub fn offset(&self, elapsed: f64) -> f64 {
		let phase = (elapsed % self.period) / self.period;
		-phase * (DASH[0] + DASH[1])
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeLabel {
	pub text: String,
	pub pill: Rect,
	pub style: TextStyle,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeVisual {
	pub path: Bezier,
	pub stroke: Stroke,
	pub opacity: f64,
	/// `None` for static edges and for every dimmed edge.
	pub animation: Option<DashAnimation>,
	pub label: Option<EdgeLabel>,
}

/// Render `edge` between the current bounds of its two nodes.
pub fn render_edge(
	edge: &Edge,
	source: Rect,
	target: Rect,
	dimmed: bool,
	theme: &Theme,
) -> EdgeVisual {
	let path = bezier_between(
		source.anchor(edge.source_handle.side),
		edge.source_handle.side,
		target.anchor(edge.target_handle.side),
		edge.target_handle.side,
	);
	let color = edge.color.clone().unwrap_or_else(|| theme.accent.clone());
	let label = edge
		.label
		.as_ref()
		.filter(|_| !dimmed)
		.map(|text| label_at(text, path.midpoint(), theme));

	EdgeVisual {
		path,
		stroke: Stroke {
			color,
			width: EDGE_WIDTH,
			dash: edge.animated.then_some(DASH),
		},
		opacity: if dimmed { DIMMED_EDGE_OPACITY } else { 1.0 },
		animation: (edge.animated && !dimmed).then(|| DashAnimation::for_edge(&edge.id)),
		label,
	}
}

fn label_at(text: &str, at: Point, theme: &Theme) -> EdgeLabel {
	let width = text.chars().count() as f64 * LABEL_CHAR_WIDTH + 16.0;
	EdgeLabel {
		text: text.to_string(),
		pill: Rect::new(
			at.x - width / 2.0,
			at.y - LABEL_HEIGHT / 2.0,
			width,
			LABEL_HEIGHT,
		),
		style: TextStyle {
			font: theme.font(500, 11.0),
			color: theme.text.clone(),
			align: TextAlign::Center,
		},
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;
	use crate::components::flow_diagram::model::Diagram;

	fn sample(animated: bool, label: Option<&str>) -> Diagram {
		let label = label
			.map(|l| format!(r#", "label": "{l}""#))
			.unwrap_or_default();
		Diagram::from_json(&format!(
			r##"{{ "title": "t",
			     "nodes": [
			       {{ "id": "a", "type": "card", "position": {{ "x": 0, "y": 0 }}, "data": {{ "label": "A" }} }},
			       {{ "id": "b", "type": "card", "position": {{ "x": 0, "y": 200 }}, "data": {{ "label": "B" }} }}
			     ],
			     "edges": [{{ "id": "a-b", "source": "a", "target": "b",
			                 "data": {{ "animated": {animated}, "color": "#f97316"{label} }} }}] }}"##
		))
		.unwrap()
	}

	fn draw(diagram: &Diagram, dimmed: bool) -> EdgeVisual {
		let nodes = diagram.nodes();
		render_edge(
			&diagram.edges()[0],
			nodes[0].bounds(),
			nodes[1].bounds(),
			dimmed,
			&Theme::default(),
		)
	}

	#[rstest]
	#[case(true)]
	#[case(false)]
	fn dimmed_edges_never_animate(#[case] animated: bool) {
		let visual = draw(&sample(animated, None), true);
		assert_eq!(visual.animation, None);
		assert_eq!(visual.opacity, DIMMED_EDGE_OPACITY);
	}

	#[test]
	fn lit_animated_edge_has_its_own_animation() {
		let visual = draw(&sample(true, None), false);
		let animation = visual.animation.unwrap();
		assert_eq!(animation.name, "edge-dash-a-b");
		assert_eq!(animation.period, 0.8);
		assert_eq!(visual.stroke.dash, Some(DASH));
		assert_eq!(visual.stroke.color, "#f97316");
		assert_eq!(visual.stroke.width, EDGE_WIDTH);
	}

	#[test]
	fn static_edge_is_solid() {
		let visual = draw(&sample(false, None), false);
		assert_eq!(visual.animation, None);
		assert_eq!(visual.stroke.dash, None);
	}

	#[test]
	fn path_runs_between_bottom_and_top_anchors() {
		let visual = draw(&sample(true, None), false);
		assert_eq!(visual.path.from, Point::new(100.0, 44.0));
		assert_eq!(visual.path.to, Point::new(100.0, 200.0));
		assert!(visual.path.c1.y > visual.path.from.y);
		assert!(visual.path.c2.y < visual.path.to.y);
	}

	#[test]
	fn label_sits_on_midpoint_and_vanishes_when_dimmed() {
		let diagram = sample(true, Some("POST /orders"));
		let lit = draw(&diagram, false);
		let label = lit.label.unwrap();
		assert_eq!(label.text, "POST /orders");
		assert_eq!(label.pill.center(), lit.path.midpoint());

		assert_eq!(draw(&diagram, true).label, None);
	}

	#[test]
	fn dash_offset_loops_every_period() {
		let anim = DashAnimation::for_edge("x");
		assert_eq!(anim.offset(0.0), 0.0);
		assert!((anim.offset(0.4) + 5.0).abs() < 1e-9);
		assert!((anim.offset(1.2) - anim.offset(0.4)).abs() < 1e-9);
	}
}
