use std::collections::HashSet;

use leptos::prelude::*;

use super::model::{Node, NodeShape};
use super::theme::Theme;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegendEntry {
	pub category: String,
	pub color: String,
}

/// Distinct categories in node order. When a category repeats with another
/// color, the first node's color is kept.
pub fn derive_legend(nodes: &[Node], theme: &Theme) -> Vec<LegendEntry> {
	let mut seen = HashSet::new();
	nodes
		.iter()
		.filter_map(|node| match &node.shape {
			NodeShape::Card(card) => card.category.as_ref().map(|category| LegendEntry {
				category: category.clone(),
				color: card.color.clone().unwrap_or_else(|| theme.card_color.clone()),
			}),
			NodeShape::Decision(_) | NodeShape::Database(_) => None,
		})
		.filter(|entry| seen.insert(entry.category.clone()))
		.collect()
}

/// Read-only strip of category swatches; renders nothing for an empty legend.
#[component]
pub fn Legend(#[prop(into)] entries: Signal<Vec<LegendEntry>>) -> impl IntoView {
	move || {
		let entries = entries.get();
		(!entries.is_empty()).then(|| {
			view! {
				<div class="flow-diagram-legend">
					{entries
						.into_iter()
						.map(|entry| {
							view! {
								<span class="flow-diagram-legend-item">
									<span
										class="flow-diagram-legend-swatch"
										style=format!("background: {};", entry.color)
									/>
									{entry.category}
								</span>
							}
						})
						.collect_view()}
				</div>
			}
		})
	}
}
