use std::collections::HashMap;
use std::time::Duration;

use log::{debug, warn};

use super::edges::{DashAnimation, EdgeVisual, render_edge};
use super::filter::{DimState, FlowFilter};
use super::geometry::{Point, Rect, ViewTransform, ZoomLimits};
use super::minimap::{MinimapLayout, layout_minimap};
use super::model::Diagram;
use super::nodes::{NodeVisual, render_node};
use super::theme::Theme;

pub const ZOOM_STEP: f64 = 1.2;
const WHEEL_STEP: f64 = 1.1;

/// Viewer settings.
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasConfig {
	pub zoom: ZoomLimits,
	/// Margin around the content on fit, as a fraction of the content size.
	pub fit_padding: f64,
	/// Wait after mount before the first fit.
	pub settle_delay: Duration,
	/// Background dot spacing in diagram units.
	pub grid_gap: f64,
	pub minimap_size: (f64, f64),
	pub minimap_margin: f64,
	pub nodes_draggable: bool,
}

impl Default for CanvasConfig {
	fn default() -> Self {
		Self {
			zoom: ZoomLimits::default(),
			fit_padding: 0.15,
			settle_delay: Duration::from_millis(100),
			grid_gap: 20.0,
			minimap_size: (200.0, 140.0),
			minimap_margin: 12.0,
			nodes_draggable: true,
		}
	}
}

impl CanvasConfig {
	/// Swap out values the canvas cannot run with: a grid gap that is not a
	/// positive number never advances the dot loop, and unordered zoom limits
	/// make every clamp panic.
	pub fn normalized(self) -> Self {
		let defaults = Self::default();
		let zoom = ZoomLimits {
			min: self.zoom.min.min(self.zoom.max),
			max: self.zoom.min.max(self.zoom.max),
		};
		let zoom = if zoom.min > 0.0 && zoom.max.is_finite() {
			zoom
		} else {
			warn!("zoom limits {:?} unusable, using defaults", self.zoom);
			defaults.zoom
		};
		let grid_gap = if self.grid_gap > 0.0 && self.grid_gap.is_finite() {
			self.grid_gap
		} else {
			warn!("grid gap {} unusable, using {}", self.grid_gap, defaults.grid_gap);
			defaults.grid_gap
		};
		Self {
			zoom,
			grid_gap,
			..self
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start: Point,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeFrame {
	pub visual: EdgeVisual,
	pub dash_offset: f64,
}

/// Everything `render` paints for one animation frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
	pub nodes: Vec<NodeVisual>,
	pub edges: Vec<EdgeFrame>,
	pub minimap: MinimapLayout,
}

/// Camera, interaction and animation state of one mounted canvas.
///
/// Node positions are copied out of the diagram on construction; dragging
/// moves the copy and the camera never touches either.
pub struct DiagramState {
	diagram: Diagram,
	theme: Theme,
	config: CanvasConfig,
	positions: Vec<Point>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
	animation_names: Vec<Option<String>>,
	clocks: HashMap<String, f64>,
	fitted: bool,
}

impl DiagramState {
	pub fn new(diagram: Diagram, theme: Theme, config: CanvasConfig, width: f64, height: f64) -> Self {
		let positions = diagram.nodes().iter().map(|n| n.position).collect();
		let animation_names: Vec<Option<String>> = diagram
			.edges()
			.iter()
			.map(|e| e.animated.then(|| DashAnimation::for_edge(&e.id).name))
			.collect();
		let clocks = animation_names
			.iter()
			.flatten()
			.map(|name| (name.clone(), 0.0))
			.collect();

		Self {
			diagram,
			theme,
			config: config.normalized(),
			positions,
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			width,
			height,
			animation_names,
			clocks,
			fitted: false,
		}
	}

	#[cfg(test)]
	pub fn diagram(&self) -> &Diagram {
		&self.diagram
	}

	pub fn config(&self) -> &CanvasConfig {
		&self.config
	}

	pub fn theme(&self) -> &Theme {
		&self.theme
	}

	/// Current (possibly dragged) top-left corner of node `idx`.
	pub fn position(&self, idx: usize) -> Point {
		self.positions[idx]
	}

	fn node_bounds(&self, idx: usize) -> Rect {
		self.diagram.nodes()[idx].bounds_at(self.position(idx))
	}

	pub fn content_bounds(&self) -> Option<Rect> {
		let rects: Vec<Rect> = (0..self.positions.len())
			.map(|i| self.node_bounds(i))
			.collect();
		Rect::bounding(&rects)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		self.transform.screen_to_graph(sx, sy)
	}

	/// Topmost node under a screen position; later nodes draw above earlier ones.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let p = self.screen_to_graph(sx, sy);
		(0..self.positions.len())
			.rev()
			.find(|&i| self.node_bounds(i).contains(p))
	}

	/// Pointer pressed: grab the node under it, or start panning.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		let hit = self
			.node_at_position(sx, sy)
			.filter(|_| self.config.nodes_draggable);
		if let Some(idx) = hit {
			self.drag = DragState {
				active: true,
				node_idx: Some(idx),
				start_x: sx,
				start_y: sy,
				node_start: self.positions[idx],
			};
		} else {
			self.pan = PanState {
				active: true,
				start_x: sx,
				start_y: sy,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
		}
	}

	pub fn pointer_moved(&mut self, sx: f64, sy: f64) {
		if self.drag.active {
			if let Some(idx) = self.drag.node_idx {
				let (dx, dy) = (
					(sx - self.drag.start_x) / self.transform.k,
					(sy - self.drag.start_y) / self.transform.k,
				);
				self.positions[idx] = self.drag.node_start.offset(dx, dy);
			}
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		}
	}

	pub fn pointer_up(&mut self) {
		if let Some(idx) = self.drag.node_idx.filter(|_| self.drag.active) {
			debug!(
				"node `{}` dropped at {:?}",
				self.diagram.nodes()[idx].id,
				self.positions[idx]
			);
		}
		self.drag = DragState::default();
		self.pan.active = false;
	}

	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 {
			1.0 / WHEEL_STEP
		} else {
			WHEEL_STEP
		};
		self.transform.zoom_at(sx, sy, factor, self.config.zoom);
	}

	/// Zoom around the viewport center, as the +/- controls do.
	pub fn zoom_by(&mut self, factor: f64) {
		self.transform
			.zoom_at(self.width / 2.0, self.height / 2.0, factor, self.config.zoom);
	}

	/// Frame all nodes. Returns false (camera untouched) for an empty diagram.
	pub fn fit_view(&mut self) -> bool {
		let Some(bounds) = self.content_bounds() else {
			return false;
		};
		self.transform = ViewTransform::fit(
			&bounds,
			self.width,
			self.height,
			self.config.fit_padding,
			self.config.zoom,
		);
		debug!("fit view to {bounds:?} at zoom {:.3}", self.transform.k);
		if !self
			.transform
			.visible_rect(self.width, self.height)
			.contains_rect(&bounds)
		{
			debug!("diagram exceeds the viewport at minimum zoom; centered only");
		}
		true
	}

	/// Fires once per mount, after the settle delay. Later calls do nothing so
	/// the user's camera is never yanked back.
	pub fn on_layout_settled(&mut self) {
		if self.fitted {
			return;
		}
		self.fitted = true;
		self.fit_view();
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Advance the clock of every edge that is currently animating.
	pub fn tick(&mut self, dt: f64, filter: &FlowFilter) {
		let dim = DimState::compute(&self.diagram, filter);
		for (name, dimmed) in self.animation_names.iter().zip(&dim.edges) {
			if let Some(name) = name.as_ref().filter(|_| !dimmed) {
				if let Some(clock) = self.clocks.get_mut(name) {
					*clock += dt;
				}
			}
		}
	}

	pub fn elapsed(&self, animation: &str) -> f64 {
		self.clocks.get(animation).copied().unwrap_or_default()
	}

	/// Build every visual for the current camera, positions and filter.
	pub fn frame(&self, filter: &FlowFilter) -> Frame {
		let dim = DimState::compute(&self.diagram, filter);
		let nodes = self
			.diagram
			.nodes()
			.iter()
			.enumerate()
			.map(|(i, node)| render_node(node, self.positions[i], dim.nodes[i], &self.theme))
			.collect();
		let edges = self
			.diagram
			.edges()
			.iter()
			.zip(&dim.edges)
			.map(|(edge, &dimmed)| {
				let visual = render_edge(
					edge,
					self.node_bounds(edge.source),
					self.node_bounds(edge.target),
					dimmed,
					&self.theme,
				);
				let dash_offset = visual
					.animation
					.as_ref()
					.map(|a| a.offset(self.elapsed(&a.name)))
					.unwrap_or_default();
				EdgeFrame {
					visual,
					dash_offset,
				}
			})
			.collect();
		let minimap = layout_minimap(
			self.diagram
				.nodes()
				.iter()
				.enumerate()
				.map(|(i, n)| (self.node_bounds(i), n.shape.color())),
			self.transform.visible_rect(self.width, self.height),
			(self.width, self.height),
			self.config.minimap_size,
			self.config.minimap_margin,
			&self.theme,
		);
		Frame {
			nodes,
			edges,
			minimap,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const DIAGRAM: &str = r##"{
		"title": "Orders",
		"nodes": [
			{ "id": "api", "type": "card", "position": { "x": 0, "y": 0 }, "data": { "label": "API", "color": "#ef4444" } },
			{ "id": "check", "type": "decision", "position": { "x": 40, "y": 150 }, "data": { "label": "Paid?" }, "flow": "pay" },
			{ "id": "db", "type": "database", "position": { "x": 600, "y": 400 }, "data": { "label": "orders" }, "flow": "store" }
		],
		"edges": [
			{ "id": "e1", "source": "api", "target": "check", "flow": "pay" },
			{ "id": "e2", "source": "check", "target": "db", "sourceHandle": "right", "flow": "store" },
			{ "id": "e3", "source": "api", "target": "db", "data": { "animated": false } }
		]
	}"##;

	fn state() -> DiagramState {
		DiagramState::new(
			Diagram::from_json(DIAGRAM).unwrap(),
			Theme::default(),
			CanvasConfig::default(),
			800.0,
			520.0,
		)
	}

	#[test]
	fn settle_fits_all_nodes_once() {
		let mut s = state();
		s.on_layout_settled();
		let bounds = s.content_bounds().unwrap();
		assert!(s.transform.visible_rect(s.width, s.height).contains_rect(&bounds));
		assert!(s.transform.k >= 0.2 && s.transform.k <= 2.0);

		s.pointer_down(790.0, 510.0);
		s.pointer_moved(700.0, 400.0);
		s.pointer_up();
		let panned = s.transform;
		s.on_layout_settled();
		assert_eq!(s.transform, panned);
	}

	#[test]
	fn empty_diagram_fit_is_a_no_op() {
		let mut s = DiagramState::new(
			Diagram::default(),
			Theme::default(),
			CanvasConfig::default(),
			800.0,
			520.0,
		);
		assert!(!s.fit_view());
		assert_eq!(s.transform, ViewTransform::default());
		let frame = s.frame(&FlowFilter::default());
		assert!(frame.nodes.is_empty());
		assert!(frame.minimap.glyphs.is_empty());
	}

	#[test]
	fn camera_moves_never_touch_positions() {
		let mut s = state();
		let before: Vec<Point> = (0..3).map(|i| s.position(i)).collect();
		s.pointer_down(790.0, 510.0);
		s.pointer_moved(500.0, 300.0);
		s.pointer_up();
		s.wheel(100.0, 100.0, -1.0);
		s.zoom_by(ZOOM_STEP);
		s.fit_view();
		let after: Vec<Point> = (0..3).map(|i| s.position(i)).collect();
		assert_eq!(before, after);
	}

	#[test]
	fn dragging_moves_only_the_local_copy() {
		let mut s = state();
		s.transform.k = 2.0;
		let camera = s.transform;
		s.pointer_down(20.0, 20.0);
		s.pointer_moved(60.0, 80.0);
		s.pointer_up();
		assert_eq!(s.position(0), Point::new(20.0, 30.0));
		assert_eq!(s.position(1), Point::new(40.0, 150.0));
		assert_eq!(s.transform, camera);
		assert_eq!(s.diagram().nodes()[0].position, Point::new(0.0, 0.0));

		let frame = s.frame(&FlowFilter::default());
		assert_eq!(frame.nodes[0].bounds.x, 20.0);
		assert_eq!(frame.edges[0].visual.path.from, Point::new(120.0, 74.0));
	}

	#[test]
	fn dragging_can_be_disabled() {
		let mut s = DiagramState::new(
			Diagram::from_json(DIAGRAM).unwrap(),
			Theme::default(),
			CanvasConfig {
				nodes_draggable: false,
				..CanvasConfig::default()
			},
			800.0,
			520.0,
		);
		s.pointer_down(20.0, 20.0);
		s.pointer_moved(60.0, 80.0);
		assert_eq!(s.position(0), Point::new(0.0, 0.0));
		assert_eq!((s.transform.x, s.transform.y), (40.0, 60.0));
	}

	#[test]
	fn unusable_config_values_fall_back() {
		let config = CanvasConfig {
			grid_gap: 0.0,
			zoom: ZoomLimits { min: 3.0, max: 0.5 },
			..CanvasConfig::default()
		}
		.normalized();
		assert_eq!(config.grid_gap, 20.0);
		assert_eq!(config.zoom, ZoomLimits { min: 0.5, max: 3.0 });

		let config = CanvasConfig {
			grid_gap: f64::NAN,
			zoom: ZoomLimits { min: -1.0, max: 2.0 },
			..CanvasConfig::default()
		}
		.normalized();
		assert_eq!(config.grid_gap, 20.0);
		assert_eq!(config.zoom, ZoomLimits::default());
	}

	#[test]
	fn swapped_zoom_limits_still_wheel() {
		let mut s = DiagramState::new(
			Diagram::from_json(DIAGRAM).unwrap(),
			Theme::default(),
			CanvasConfig {
				zoom: ZoomLimits { min: 2.0, max: 0.2 },
				grid_gap: -5.0,
				..CanvasConfig::default()
			},
			800.0,
			520.0,
		);
		s.wheel(100.0, 100.0, 1.0);
		assert_eq!(s.config().grid_gap, 20.0);
		assert!((s.transform.k - 1.0 / 1.1).abs() < 1e-9);
	}

	#[test]
	fn hit_test_prefers_topmost_node() {
		let s = state();
		assert_eq!(s.node_at_position(50.0, 160.0), Some(1));
		assert_eq!(s.node_at_position(5.0, 5.0), Some(0));
		assert_eq!(s.node_at_position(400.0, 300.0), None);
	}

	#[test]
	fn each_edge_runs_its_own_clock() {
		let mut s = state();
		let pay = FlowFilter::new("pay");
		s.tick(0.5, &pay);
		s.tick(0.25, &FlowFilter::default());
		assert_eq!(s.elapsed("edge-dash-e1"), 0.75);
		assert_eq!(s.elapsed("edge-dash-e2"), 0.25);
		assert_eq!(s.elapsed("edge-dash-e3"), 0.0);
	}

	#[test]
	fn frame_reflects_filter_atomically() {
		let s = state();
		let frame = s.frame(&FlowFilter::new("pay"));
		let opacities: Vec<f64> = frame.nodes.iter().map(|n| n.opacity).collect();
		assert_eq!(opacities, [1.0, 1.0, 0.15]);
		assert!(frame.edges[0].visual.animation.is_some());
		assert!(frame.edges[1].visual.animation.is_none());
		assert_eq!(frame.edges[1].dash_offset, 0.0);

		let all = s.frame(&FlowFilter::default());
		assert!(all.nodes.iter().all(|n| n.opacity == 1.0));
	}

	#[test]
	fn minimap_colors_follow_nodes() {
		let s = state();
		let frame = s.frame(&FlowFilter::default());
		let colors: Vec<&str> = frame
			.minimap
			.glyphs
			.iter()
			.map(|g| g.color.as_str())
			.collect();
		let accent = Theme::default().accent;
		assert_eq!(colors, ["#ef4444", accent.as_str(), accent.as_str()]);
	}
}
