//! Validated diagram model.
//!
//! Node kinds are a closed sum type: the tag from the authored data is matched
//! exactly once, in [`NodeShape::from_spec`], and everything downstream matches
//! exhaustively on [`NodeShape`].

use std::collections::{HashMap, HashSet};

use log::warn;

use super::error::{DiagramError, Endpoint};
use super::geometry::{Point, Rect, Side};
use super::types::{DiagramDefinition, FlowFilterButton, NodeSpec};

pub const CARD_WIDTH: f64 = 200.0;
pub const CARD_HEADER_HEIGHT: f64 = 24.0;
pub const CARD_BODY_HEIGHT: f64 = 44.0;
pub const CARD_DESCRIPTION_HEIGHT: f64 = 20.0;
/// Bounding box of the decision diamond.
pub const DECISION_SIZE: f64 = 120.0;
pub const DATABASE_WIDTH: f64 = 150.0;
pub const DATABASE_HEIGHT: f64 = 110.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleKind {
	Source,
	Target,
}

/// A connection anchor on a node's border.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Handle {
	pub id: &'static str,
	pub side: Side,
	pub kind: HandleKind,
}

const TOP_TARGET: Handle = Handle {
	id: "top",
	side: Side::Top,
	kind: HandleKind::Target,
};
const BOTTOM_SOURCE: Handle = Handle {
	id: "bottom",
	side: Side::Bottom,
	kind: HandleKind::Source,
};
const LEFT_TARGET: Handle = Handle {
	id: "left",
	side: Side::Left,
	kind: HandleKind::Target,
};
const RIGHT_SOURCE: Handle = Handle {
	id: "right",
	side: Side::Right,
	kind: HandleKind::Source,
};

const DEFAULT_HANDLES: [Handle; 2] = [TOP_TARGET, BOTTOM_SOURCE];
const DECISION_HANDLES: [Handle; 4] = [TOP_TARGET, LEFT_TARGET, BOTTOM_SOURCE, RIGHT_SOURCE];

#[derive(Clone, Debug, PartialEq)]
pub struct CardNode {
	pub label: String,
	pub color: Option<String>,
	pub category: Option<String>,
	pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DecisionNode {
	pub label: String,
	pub color: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DatabaseNode {
	pub label: String,
	pub color: Option<String>,
	pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeShape {
	Card(CardNode),
	Decision(DecisionNode),
	Database(DatabaseNode),
}

impl NodeShape {
	fn from_spec(spec: &NodeSpec) -> Result<Self, DiagramError> {
		let data = &spec.data;
		let shape = match spec.type_tag.as_str() {
			"card" => NodeShape::Card(CardNode {
				label: data.label.clone(),
				color: data.color.clone(),
				category: data.category.clone(),
				description: data.description.clone(),
			}),
			"decision" => NodeShape::Decision(DecisionNode {
				label: data.label.clone(),
				color: data.color.clone(),
			}),
			"database" => NodeShape::Database(DatabaseNode {
				label: data.label.clone(),
				color: data.color.clone(),
				description: data.description.clone(),
			}),
			tag => {
				return Err(DiagramError::UnknownNodeType {
					node: spec.id.clone(),
					tag: tag.to_string(),
				});
			}
		};
		if shape.label().trim().is_empty() {
			return Err(DiagramError::EmptyLabel {
				node: spec.id.clone(),
			});
		}
		Ok(shape)
	}

	pub fn label(&self) -> &str {
		match self {
			NodeShape::Card(c) => &c.label,
			NodeShape::Decision(d) => &d.label,
			NodeShape::Database(d) => &d.label,
		}
	}

	/// The color the author declared, if any.
	pub fn color(&self) -> Option<&str> {
		match self {
			NodeShape::Card(c) => c.color.as_deref(),
			NodeShape::Decision(d) => d.color.as_deref(),
			NodeShape::Database(d) => d.color.as_deref(),
		}
	}

	pub fn size(&self) -> (f64, f64) {
		match self {
			NodeShape::Card(c) => {
				let mut h = CARD_BODY_HEIGHT;
				if c.category.is_some() {
					h += CARD_HEADER_HEIGHT;
				}
				if c.description.is_some() {
					h += CARD_DESCRIPTION_HEIGHT;
				}
				(CARD_WIDTH, h)
			}
			NodeShape::Decision(_) => (DECISION_SIZE, DECISION_SIZE),
			NodeShape::Database(_) => (DATABASE_WIDTH, DATABASE_HEIGHT),
		}
	}

	pub fn handles(&self) -> &'static [Handle] {
		match self {
			NodeShape::Decision(_) => &DECISION_HANDLES,
			NodeShape::Card(_) | NodeShape::Database(_) => &DEFAULT_HANDLES,
		}
	}

	/// The handle an edge uses when it names none.
	pub fn default_handle(&self, kind: HandleKind) -> Handle {
		match kind {
			HandleKind::Source => BOTTOM_SOURCE,
			HandleKind::Target => TOP_TARGET,
		}
	}

	fn handle(&self, id: Option<&str>, kind: HandleKind) -> Option<Handle> {
		match id {
			None => Some(self.default_handle(kind)),
			Some(id) => self
				.handles()
				.iter()
				.find(|h| h.id == id && h.kind == kind)
				.copied(),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: String,
	pub position: Point,
	pub shape: NodeShape,
	pub flow: Option<String>,
	/// Statically dimmed by the author, independent of the flow filter.
	pub dimmed: bool,
}

impl Node {
	/// Bounding box if the node's top-left corner sat at `position`.
	pub fn bounds_at(&self, position: Point) -> Rect {
		let (w, h) = self.shape.size();
		Rect::new(position.x, position.y, w, h)
	}

	#[cfg(test)]
	pub fn bounds(&self) -> Rect {
		self.bounds_at(self.position)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	pub id: String,
	/// Index into [`Diagram::nodes`].
	pub source: usize,
	pub target: usize,
	pub source_handle: Handle,
	pub target_handle: Handle,
	pub label: Option<String>,
	pub color: Option<String>,
	pub animated: bool,
	pub dimmed: bool,
	pub flow: Option<String>,
}

/// A checked diagram: unique ids, known node types, resolvable edges.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Diagram {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	flows: Vec<FlowFilterButton>,
}

impl Diagram {
	pub fn build(def: &DiagramDefinition) -> Result<Self, DiagramError> {
		let mut index = HashMap::with_capacity(def.nodes.len());
		let mut nodes = Vec::with_capacity(def.nodes.len());
		for spec in &def.nodes {
			if index.insert(spec.id.as_str(), nodes.len()).is_some() {
				return Err(DiagramError::DuplicateNode(spec.id.clone()));
			}
			nodes.push(Node {
				id: spec.id.clone(),
				position: spec.position,
				shape: NodeShape::from_spec(spec)?,
				flow: spec.flow.clone(),
				dimmed: spec.data.dimmed,
			});
		}

		let mut edge_ids = HashSet::with_capacity(def.edges.len());
		let mut edges = Vec::with_capacity(def.edges.len());
		for spec in &def.edges {
			if !edge_ids.insert(spec.id.as_str()) {
				return Err(DiagramError::DuplicateEdge(spec.id.clone()));
			}
			let resolve = |node_id: &str, handle: Option<&str>, endpoint: Endpoint| {
				let &idx = index
					.get(node_id)
					.ok_or_else(|| DiagramError::MissingNode {
						edge: spec.id.clone(),
						endpoint,
						node: node_id.to_string(),
					})?;
				let kind = match endpoint {
					Endpoint::Source => HandleKind::Source,
					Endpoint::Target => HandleKind::Target,
				};
				let handle = nodes[idx].shape.handle(handle, kind).ok_or_else(|| {
					DiagramError::UnknownHandle {
						edge: spec.id.clone(),
						endpoint,
						node: node_id.to_string(),
						handle: handle.unwrap_or_default().to_string(),
					}
				})?;
				Ok::<_, DiagramError>((idx, handle))
			};
			let (source, source_handle) =
				resolve(&spec.source, spec.source_handle.as_deref(), Endpoint::Source)?;
			let (target, target_handle) =
				resolve(&spec.target, spec.target_handle.as_deref(), Endpoint::Target)?;
			edges.push(Edge {
				id: spec.id.clone(),
				source,
				target,
				source_handle,
				target_handle,
				label: spec.data.label.clone().filter(|l| !l.is_empty()),
				color: spec.data.color.clone(),
				animated: spec.data.animated,
				dimmed: spec.data.dimmed,
				flow: spec.flow.clone(),
			});
		}

		let diagram = Self {
			nodes,
			edges,
			flows: def.flow_filter_buttons.clone(),
		};
		diagram.warn_undeclared_flows();
		Ok(diagram)
	}

	#[cfg(test)]
	pub fn from_json(json: &str) -> Result<Self, DiagramError> {
		Self::build(&DiagramDefinition::from_json(json)?)
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	pub fn flows(&self) -> &[FlowFilterButton] {
		&self.flows
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	fn warn_undeclared_flows(&self) {
		if self.flows.is_empty() {
			return;
		}
		let declared: HashSet<&str> = self
			.flows
			.iter()
			.map(|f| f.flow_identifier.as_str())
			.collect();
		let members = self
			.nodes
			.iter()
			.map(|n| (&n.id, &n.flow))
			.chain(self.edges.iter().map(|e| (&e.id, &e.flow)));
		for (id, flow) in members {
			if let Some(flow) = flow.as_deref().filter(|f| !declared.contains(f)) {
				warn!("`{id}` belongs to flow `{flow}` which has no filter button");
			}
		}
	}
}
