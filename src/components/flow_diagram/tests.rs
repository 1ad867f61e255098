use rstest::rstest;

use super::error::DiagramError;
use super::filter::FlowFilter;
use super::legend::derive_legend;
use super::model::Diagram;
use super::state::{CanvasConfig, DiagramState};
use super::theme::Theme;
use super::types::DiagramDefinition;

const CHECKOUT: &str = include_str!("../../pages/diagrams/checkout.json");
const CATALOG: &str = include_str!("../../pages/diagrams/catalog.json");

fn mount(def: &DiagramDefinition) -> DiagramState {
	DiagramState::new(
		Diagram::build(def).expect("valid diagram"),
		Theme::default(),
		CanvasConfig::default(),
		960.0,
		560.0,
	)
}

#[rstest]
#[case::checkout(CHECKOUT)]
#[case::catalog(CATALOG)]
fn bundled_diagrams_round_trip_without_visual_change(#[case] json: &str) {
	let original = DiagramDefinition::from_json(json).unwrap();
	let reparsed = DiagramDefinition::from_json(&original.to_json().unwrap()).unwrap();
	assert_eq!(original, reparsed);

	let (mut a, mut b) = (mount(&original), mount(&reparsed));
	a.on_layout_settled();
	b.on_layout_settled();
	for filter in ["", "payment", "fulfilment"].map(FlowFilter::new) {
		assert_eq!(a.frame(&filter), b.frame(&filter));
	}
}

#[rstest]
#[case::checkout(CHECKOUT)]
#[case::catalog(CATALOG)]
fn settled_viewport_frames_every_node(#[case] json: &str) {
	let mut state = mount(&DiagramDefinition::from_json(json).unwrap());
	state.on_layout_settled();
	let visible = state.transform.visible_rect(state.width, state.height);
	let bounds = state.content_bounds().unwrap();
	assert!(visible.contains_rect(&bounds), "{visible:?} misses {bounds:?}");
}

#[test]
fn checkout_filter_isolates_payment_path() {
	let state = mount(&DiagramDefinition::from_json(CHECKOUT).unwrap());
	let frame = state.frame(&FlowFilter::new("payment"));
	let diagram = state.diagram();

	let dimmed: Vec<&str> = diagram
		.nodes()
		.iter()
		.zip(&frame.nodes)
		.filter(|(_, visual)| visual.opacity < 1.0)
		.map(|(node, _)| node.id.as_str())
		.collect();
	assert_eq!(dimmed, ["backorder", "warehouse"]);

	for (edge, drawn) in diagram.edges().iter().zip(&frame.edges) {
		let in_fulfilment = edge.id.starts_with("stock-backorder") || edge.id.starts_with("backorder-");
		assert_eq!(
			drawn.visual.animation.is_none(),
			in_fulfilment || edge.id == "orders-db"
		);
		if in_fulfilment {
			assert!(drawn.visual.label.is_none());
		}
	}
}

#[test]
fn checkout_legend_lists_each_category_once() {
	let diagram = Diagram::from_json(CHECKOUT).unwrap();
	let categories: Vec<String> = derive_legend(diagram.nodes(), &Theme::default())
		.into_iter()
		.map(|e| e.category)
		.collect();
	assert_eq!(categories, ["Client", "Edge", "Service", "External"]);
}

#[test]
fn bogus_node_type_fails_the_whole_diagram() {
	let json = r#"{
		"title": "broken",
		"nodes": [
			{ "id": "ok", "type": "card", "position": { "x": 0, "y": 0 }, "data": { "label": "fine" } },
			{ "id": "typo", "type": "bogus", "position": { "x": 0, "y": 100 }, "data": { "label": "oops" } }
		]
	}"#;
	let err = Diagram::from_json(json).unwrap_err();
	assert!(matches!(err, DiagramError::UnknownNodeType { ref node, .. } if node == "typo"));
	assert!(err.to_string().contains("bogus"));
}
