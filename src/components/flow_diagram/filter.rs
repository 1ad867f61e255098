//! Flow filtering. The authored graph is never mutated: which elements are
//! dimmed is derived from the active flow every time a frame is built.

use super::model::Diagram;
use super::types::FlowFilterButton;

/// The currently isolated flow, or none for "All".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlowFilter {
	active: Option<String>,
}

impl FlowFilter {
	/// An empty identifier means "All".
	pub fn new(active: impl Into<String>) -> Self {
		let active = active.into();
		Self {
			active: (!active.is_empty()).then_some(active),
		}
	}

	pub fn active(&self) -> Option<&str> {
		self.active.as_deref()
	}

	/// Switch to `flow` (empty for "All"). Returns whether anything changed.
	pub fn select(&mut self, flow: &str) -> bool {
		let next = Self::new(flow);
		if *self == next {
			return false;
		}
		*self = next;
		true
	}

	/// Elements without a flow stay lit; so does everything while "All" is active.
	pub fn is_dimmed(&self, membership: Option<&str>) -> bool {
		match (self.active(), membership) {
			(Some(active), Some(flow)) => active != flow,
			_ => false,
		}
	}
}

/// Effective dim flags for one frame, indexed like the diagram's nodes and edges.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DimState {
	pub nodes: Vec<bool>,
	pub edges: Vec<bool>,
}

impl DimState {
	pub fn compute(diagram: &Diagram, filter: &FlowFilter) -> Self {
		Self {
			nodes: diagram
				.nodes()
				.iter()
				.map(|n| n.dimmed || filter.is_dimmed(n.flow.as_deref()))
				.collect(),
			edges: diagram
				.edges()
				.iter()
				.map(|e| e.dimmed || filter.is_dimmed(e.flow.as_deref()))
				.collect(),
		}
	}
}

/// One toolbar button as it should be drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonState {
	pub label: String,
	/// Empty for "All".
	pub flow: String,
	/// `None` means the neutral theme color.
	pub color: Option<String>,
	pub active: bool,
}

/// A leading "All" button followed by one per flow; empty when no flows are declared.
pub fn button_states(flows: &[FlowFilterButton], filter: &FlowFilter) -> Vec<ButtonState> {
	if flows.is_empty() {
		return Vec::new();
	}
	let all = ButtonState {
		label: "All".into(),
		flow: String::new(),
		color: None,
		active: filter.active().is_none(),
	};
	std::iter::once(all)
		.chain(flows.iter().map(|f| ButtonState {
			label: f.label.clone(),
			flow: f.flow_identifier.clone(),
			color: Some(f.color.clone()),
			active: filter.active() == Some(f.flow_identifier.as_str()),
		}))
		.collect()
}
