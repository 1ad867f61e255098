use leptos::prelude::*;
use log::{error, info};

use crate::components::flow_diagram::{DiagramDefinition, DiagramError, FlowDiagram};

const CHECKOUT: &str = include_str!("diagrams/checkout.json");
const CATALOG: &str = include_str!("diagrams/catalog.json");

/// Authored diagrams bundled with the site.
pub fn bundled_diagrams() -> Vec<(&'static str, &'static str)> {
	vec![("checkout", CHECKOUT), ("catalog", CATALOG)]
}

/// Parse each source on its own; a malformed one fails only its own entry.
fn load_diagrams<'a>(
	sources: &[(&'a str, &str)],
) -> Vec<(&'a str, Result<DiagramDefinition, DiagramError>)> {
	sources
		.iter()
		.map(|&(name, json)| {
			let definition = DiagramDefinition::from_json(json)
				.inspect_err(|err| error!("bundled diagram `{name}`: {err}"));
			(name, definition)
		})
		.collect()
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let on_flow_filter_change = Callback::new(|flow: String| {
		if flow.is_empty() {
			info!("showing all flows");
		} else {
			info!("isolating flow `{flow}`");
		}
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<main class="architecture-page">
				<h1>"Service Architecture"</h1>
				<p class="subtitle">
					"Drag nodes to reposition. Scroll to zoom. Drag background to pan."
				</p>
				{load_diagrams(&bundled_diagrams())
					.into_iter()
					.map(|(name, definition)| {
						// A broken diagram fails only its own boundary.
						view! {
							<ErrorBoundary fallback=move |errors| {
								view! {
									<section class="flow-diagram flow-diagram-error">
										<h3 class="flow-diagram-title">
											{format!("Diagram `{name}` could not be shown")}
										</h3>
										<ul>
											{move || {
												errors
													.get()
													.into_iter()
													.map(|(_, e)| view! { <li>{e.to_string()}</li> })
													.collect_view()
											}}
										</ul>
									</section>
								}
							}>
								{definition
									.map(|definition| {
										view! {
											<FlowDiagram
												definition=definition
												on_flow_filter_change=on_flow_filter_change
											/>
										}
									})}
							</ErrorBoundary>
						}
					})
					.collect_view()}
			</main>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bundled_diagrams_all_parse() {
		let loaded = load_diagrams(&bundled_diagrams());
		assert_eq!(loaded.len(), 2);
		assert!(loaded.iter().all(|(_, definition)| definition.is_ok()));
	}

	#[test]
	fn a_broken_diagram_fails_only_itself() {
		let loaded = load_diagrams(&[
			("checkout", CHECKOUT),
			("broken", r#"{ "title": "#),
			("catalog", CATALOG),
		]);
		let failed: Vec<&str> = loaded
			.iter()
			.filter(|(_, definition)| definition.is_err())
			.map(|&(name, _)| name)
			.collect();
		assert_eq!(failed, ["broken"]);
		assert_eq!(loaded[2].1.as_ref().unwrap().title, "Catalog read model");
	}
}
