/// Why a graph snapshot could not be loaded. Shown to the user in place of the graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphLoadError {
	/// The data provider rejected the request
	#[error("graph data request failed: {0}")]
	Provider(String),

	/// The payload did not match the expected node/edge shape
	#[error("malformed graph data: {0}")]
	Decode(#[from] serde_json::Error),
}
