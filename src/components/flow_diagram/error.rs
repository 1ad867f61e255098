use std::fmt;

/// Which end of an edge a diagnostic refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
	Source,
	Target,
}

impl fmt::Display for Endpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Endpoint::Source => "source",
			Endpoint::Target => "target",
		})
	}
}

/// Authoring mistakes in a diagram definition. Any of these keeps the whole
/// diagram from rendering.
#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
	#[error("node `{node}` has unknown node type `{tag}` (expected card, decision or database)")]
	UnknownNodeType { node: String, tag: String },
	#[error("node `{node}` has an empty label")]
	EmptyLabel { node: String },
	#[error("node id `{0}` is declared more than once")]
	DuplicateNode(String),
	#[error("edge id `{0}` is declared more than once")]
	DuplicateEdge(String),
	#[error("edge `{edge}` {endpoint} references missing node `{node}`")]
	MissingNode {
		edge: String,
		endpoint: Endpoint,
		node: String,
	},
	#[error("edge `{edge}` uses {endpoint} handle `{handle}` which node `{node}` does not expose")]
	UnknownHandle {
		edge: String,
		endpoint: Endpoint,
		node: String,
		handle: String,
	},
	#[error("invalid diagram JSON: {0}")]
	Json(#[from] serde_json::Error),
}
