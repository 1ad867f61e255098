use leptos::prelude::*;
use log::debug;

use super::filter::{ButtonState, FlowFilter, button_states};
use super::theme::Theme;
use super::types::FlowFilterButton;

fn button_style(button: &ButtonState, theme: &Theme) -> String {
	let neutral = theme.neutral.as_str();
	let color = button.color.as_deref().unwrap_or(neutral);
	if button.active {
		format!(
			"background: {color}; border: 1px solid {color}; color: {};",
			theme.header_text
		)
	} else {
		format!("background: transparent; border: 1px solid {neutral}; color: inherit;")
	}
}

/// One click on a flow button: `""` is "All". Reports every click, repeats
/// included.
fn select_flow(active_flow: RwSignal<String>, on_change: Option<Callback<String>>, flow: String) {
	debug!("flow filter set to {flow:?}");
	active_flow.set(flow.clone());
	if let Some(cb) = on_change {
		cb.run(flow);
	}
}

/// Title plus, when flows are declared, an "All" button and one per flow.
/// Every click writes the active flow and reports it, even if unchanged.
#[component]
pub fn Toolbar(
	#[prop(into)] title: String,
	#[prop(optional)] flows: Vec<FlowFilterButton>,
	active_flow: RwSignal<String>,
	#[prop(default = None)] on_flow_filter_change: Option<Callback<String>>,
	#[prop(optional)] theme: Theme,
) -> impl IntoView {
	let buttons = move || {
		let filter = FlowFilter::new(active_flow.get());
		let states = button_states(&flows, &filter);
		(!states.is_empty()).then(|| {
			view! {
				<div class="flow-diagram-filters" role="group">
					{states
						.into_iter()
						.map(|button| {
							let style = button_style(&button, &theme);
							let flow = button.flow;
							view! {
								<button
									class="flow-diagram-filter"
									class:active=button.active
									style=style
									on:click=move |_| {
										select_flow(active_flow, on_flow_filter_change, flow.clone())
									}
								>
									{button.label}
								</button>
							}
						})
						.collect_view()}
				</div>
			}
		})
	};

	view! {
		<div class="flow-diagram-toolbar">
			<h3 class="flow-diagram-title">{title}</h3>
			{buttons}
		</div>
	}
}

#[cfg(test)]
mod tests {
	use std::sync::{Arc, Mutex};

	use super::*;

	#[test]
	fn active_buttons_take_the_flow_color() {
		let theme = Theme::default();
		let active = ButtonState {
			label: "Pay".into(),
			flow: "pay".into(),
			color: Some("#22c55e".into()),
			active: true,
		};
		let style = button_style(&active, &theme);
		assert!(style.starts_with("background: #22c55e;"));
		assert!(style.ends_with(&format!("color: {};", theme.header_text)));

		let idle = ButtonState {
			active: false,
			..active
		};
		let style = button_style(&idle, &theme);
		assert!(style.contains("background: transparent;"));
		assert!(style.contains(&theme.neutral));
		assert!(!style.contains("#22c55e"));
	}

	#[test]
	fn uncolored_buttons_use_the_theme_neutral() {
		let theme = Theme {
			neutral: "#abcdef".into(),
			..Theme::default()
		};
		let all = ButtonState {
			label: "All".into(),
			flow: String::new(),
			color: None,
			active: true,
		};
		assert!(button_style(&all, &theme).starts_with("background: #abcdef;"));
	}

	#[test]
	fn every_click_is_reported_once() {
		let owner = Owner::new();
		owner.with(|| {
			let seen = Arc::new(Mutex::new(Vec::<String>::new()));
			let active = RwSignal::new(String::new());
			let on_change = Callback::new({
				let seen = seen.clone();
				move |flow: String| seen.lock().unwrap().push(flow)
			});

			select_flow(active, Some(on_change), "payment".into());
			select_flow(active, Some(on_change), "payment".into());
			assert_eq!(active.get_untracked(), "payment");

			select_flow(active, Some(on_change), String::new());
			assert_eq!(active.get_untracked(), "");
			assert_eq!(*seen.lock().unwrap(), ["payment", "payment", ""]);
		});
	}

	#[test]
	fn clicks_without_a_listener_still_switch_flows() {
		let owner = Owner::new();
		owner.with(|| {
			let active = RwSignal::new("payment".to_string());
			select_flow(active, None, "fulfilment".into());
			assert_eq!(active.get_untracked(), "fulfilment");
		});
	}
}
