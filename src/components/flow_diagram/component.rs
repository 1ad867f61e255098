use leptos::prelude::*;
use log::error;

use super::canvas::DiagramCanvas;
use super::error::DiagramError;
use super::legend::{Legend, derive_legend};
use super::model::Diagram;
use super::state::CanvasConfig;
use super::theme::Theme;
use super::toolbar::Toolbar;
use super::types::DiagramDefinition;

/// Toolbar, legend and canvas for one authored diagram.
///
/// A definition that fails validation renders nothing: the error is logged
/// and handed to the nearest `ErrorBoundary`.
#[component]
pub fn FlowDiagram(
	#[prop(into)] definition: Signal<DiagramDefinition>,
	#[prop(optional)] on_flow_filter_change: Option<Callback<String>>,
	#[prop(optional)] theme: Theme,
	#[prop(optional)] config: CanvasConfig,
) -> impl IntoView {
	let active_flow = RwSignal::new(definition.with_untracked(|d| d.active_flow.clone()));
	// A caller that changes `activeFlow` in the definition takes over the filter.
	Effect::new(move |_| {
		let flow = definition.with(|d| d.active_flow.clone());
		active_flow.set(flow);
	});

	move || {
		let def = definition.get();
		let diagram = Diagram::build(&def)
			.inspect_err(|err| error!("diagram {:?} not rendered: {err}", def.title))?;
		let legend = derive_legend(diagram.nodes(), &theme);
		let flows = diagram.flows().to_vec();

		Ok::<_, DiagramError>(view! {
			<section class="flow-diagram">
				<Toolbar
					title=def.title
					flows=flows
					active_flow=active_flow
					on_flow_filter_change=on_flow_filter_change
					theme=theme.clone()
				/>
				<Legend entries=legend />
				<DiagramCanvas
					diagram=diagram
					active_flow=active_flow
					height=def.height
					theme=theme.clone()
					config=config.clone()
				/>
			</section>
		})
	}
}
