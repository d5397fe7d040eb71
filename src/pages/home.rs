use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use log::warn;

use crate::components::knowledge_graph::{
	GraphData, GraphDataProvider, KnowledgeGraphCanvas, LoadSequencer, NavigationIntent,
	StaticGraphProvider,
};

/// Route a graph click leads to: the page itself, or the page list filtered by tag.
fn route_for(intent: &NavigationIntent) -> String {
	match intent {
		NavigationIntent::Page { id } => {
			format!("/pages/{}", String::from(js_sys::encode_uri_component(id)))
		}
		NavigationIntent::Tag { label } => {
			format!(
				"/pages?tag={}",
				String::from(js_sys::encode_uri_component(label))
			)
		}
	}
}

/// Knowledge graph page
#[component]
pub fn Home() -> impl IntoView {
	let graph = RwSignal::new(GraphData::default());
	let error = RwSignal::new(None::<String>);
	let loading = RwSignal::new(false);
	let provider: Rc<dyn GraphDataProvider> = Rc::new(StaticGraphProvider::sample());
	let sequencer = Rc::new(RefCell::new(LoadSequencer::default()));

	let reload = move || {
		let ticket = sequencer.borrow_mut().begin();
		let fetch = provider.fetch_graph();
		let sequencer = sequencer.clone();
		loading.set(true);
		spawn_local(async move {
			let result = fetch.await;
			let Some(result) = sequencer.borrow().settle(ticket, result) else {
				return;
			};
			loading.set(false);
			match result {
				Ok(data) => {
					error.set(None);
					graph.set(data);
				}
				Err(err) => {
					warn!("Knowledge graph load failed: {err}");
					error.set(Some(err.to_string()));
				}
			}
		});
	};
	reload();
	let refresh = reload.clone();

	let navigate = use_navigate();
	let on_navigate =
		move |intent: NavigationIntent| navigate(&route_for(&intent), NavigateOptions::default());

	view! {
		<div class="knowledge-graph">
			<KnowledgeGraphCanvas data=graph on_navigate=on_navigate />
			<div class="knowledge-graph-status">
				<button on:click=move |_| refresh()>"Refresh"</button>
				{move || loading.get().then_some(" Loading…")}
				{move || {
					error
						.get()
						.map(|msg| view! { <p class="error">"Could not load the knowledge graph: " {msg}</p> })
				}}
			</div>
		</div>
	}
}
