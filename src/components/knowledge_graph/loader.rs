use std::future::{self, Future};
use std::pin::Pin;

use log::debug;

use super::error::GraphLoadError;
use super::types::GraphData;

pub type GraphFuture = Pin<Box<dyn Future<Output = Result<GraphData, GraphLoadError>>>>;

/// Source of graph snapshots, e.g. the wiki's REST endpoint.
pub trait GraphDataProvider {
	fn fetch_graph(&self) -> GraphFuture;
}

/// Serves a fixed JSON payload.
pub struct StaticGraphProvider {
	payload: &'static str,
}

impl StaticGraphProvider {
	pub fn new(payload: &'static str) -> Self {
		Self { payload }
	}

	pub fn sample() -> Self {
		Self::new(include_str!("../../../assets/sample_graph.json"))
	}
}

impl GraphDataProvider for StaticGraphProvider {
	fn fetch_graph(&self) -> GraphFuture {
		let result = if self.payload.trim().is_empty() {
			Err(GraphLoadError::Provider("empty graph payload".into()))
		} else {
			GraphData::from_json(self.payload)
		};
		Box::pin(future::ready(result))
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Orders overlapping loads: only the most recently started one may apply its result.
#[derive(Debug, Default)]
pub struct LoadSequencer {
	latest: u64,
}

impl LoadSequencer {
	pub fn begin(&mut self) -> LoadTicket {
		self.latest += 1;
		LoadTicket(self.latest)
	}

	pub fn is_current(&self, ticket: LoadTicket) -> bool {
		ticket.0 == self.latest
	}

	/// Passes `result` through for the current ticket, drops it for a superseded one.
	pub fn settle<T>(&self, ticket: LoadTicket, result: T) -> Option<T> {
		if self.is_current(ticket) {
			Some(result)
		} else {
			debug!("Dropping stale graph load #{} (latest is #{})", ticket.0, self.latest);
			None
		}
	}
}
