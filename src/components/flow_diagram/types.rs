//! Authored diagram description, exactly as it appears in JSON data files.
//!
//! Nothing here is validated; [`Diagram::build`](super::model::Diagram::build)
//! turns a definition into the checked model the renderers consume.

use serde::{Deserialize, Serialize};

use super::error::DiagramError;
use super::geometry::Point;

pub const DEFAULT_HEIGHT: &str = "520px";

fn default_height() -> String {
	DEFAULT_HEIGHT.into()
}

fn default_animated() -> bool {
	true
}

fn is_false(b: &bool) -> bool {
	!*b
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
	#[serde(default)]
	pub label: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "is_false")]
	pub dimmed: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
	pub id: String,
	/// `card`, `decision` or `database`.
	#[serde(rename = "type")]
	pub type_tag: String,
	pub position: Point,
	#[serde(default)]
	pub data: NodeData,
	/// Flow this node belongs to; nodes without one are never filtered out.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub flow: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
	#[serde(default = "default_animated")]
	pub animated: bool,
	#[serde(default, skip_serializing_if = "is_false")]
	pub dimmed: bool,
}

impl Default for EdgeData {
	fn default() -> Self {
		Self {
			label: None,
			color: None,
			animated: default_animated(),
			dimmed: false,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeSpec {
	pub id: String,
	pub source: String,
	pub target: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source_handle: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub target_handle: Option<String>,
	#[serde(default)]
	pub data: EdgeData,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub flow: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowFilterButton {
	pub label: String,
	pub flow_identifier: String,
	pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramDefinition {
	pub title: String,
	#[serde(default = "default_height")]
	pub height: String,
	#[serde(default)]
	pub nodes: Vec<NodeSpec>,
	#[serde(default)]
	pub edges: Vec<EdgeSpec>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub flow_filter_buttons: Vec<FlowFilterButton>,
	/// Empty means "All".
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub active_flow: String,
}

impl Default for DiagramDefinition {
	fn default() -> Self {
		Self {
			title: String::new(),
			height: default_height(),
			nodes: Vec::new(),
			edges: Vec::new(),
			flow_filter_buttons: Vec::new(),
			active_flow: String::new(),
		}
	}
}

impl DiagramDefinition {
	pub fn from_json(json: &str) -> Result<Self, DiagramError> {
		Ok(serde_json::from_str(json)?)
	}

	#[cfg(test)]
	pub fn to_json(&self) -> Result<String, DiagramError> {
		Ok(serde_json::to_string_pretty(self)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn minimal_json_fills_defaults() {
		let def = DiagramDefinition::from_json(
			r#"{
				"title": "Orders",
				"nodes": [{ "id": "a", "type": "card", "position": { "x": 1, "y": 2 },
				            "data": { "label": "API" } }],
				"edges": [{ "id": "e", "source": "a", "target": "a" }]
			}"#,
		)
		.unwrap();
		assert_eq!(def.height, "520px");
		assert_eq!(def.active_flow, "");
		assert!(def.flow_filter_buttons.is_empty());
		assert_eq!(def.nodes[0].position, Point::new(1.0, 2.0));
		assert!(!def.nodes[0].data.dimmed);
		assert!(def.edges[0].data.animated);
	}

	#[test]
	fn camel_case_keys() {
		let def = DiagramDefinition::from_json(
			r##"{
				"title": "t",
				"edges": [{ "id": "e", "source": "a", "target": "b",
				            "sourceHandle": "right", "targetHandle": "left",
				            "data": { "animated": false } }],
				"flowFilterButtons": [{ "label": "Pay", "flowIdentifier": "pay", "color": "#f00" }],
				"activeFlow": "pay"
			}"##,
		)
		.unwrap();
		assert_eq!(def.edges[0].source_handle.as_deref(), Some("right"));
		assert_eq!(def.edges[0].target_handle.as_deref(), Some("left"));
		assert!(!def.edges[0].data.animated);
		assert_eq!(def.flow_filter_buttons[0].flow_identifier, "pay");
		assert_eq!(def.active_flow, "pay");
	}

	#[test]
	fn malformed_json_is_an_error() {
		assert!(matches!(
			DiagramDefinition::from_json("{ \"nodes\": 3 }"),
			Err(DiagramError::Json(_))
		));
	}
}
