mod camera;
mod component;
mod error;
mod interaction;
mod loader;
mod picking;
mod render;
mod simulation;
mod state;
mod types;

pub use component::KnowledgeGraphCanvas;
pub use loader::{GraphDataProvider, LoadSequencer, StaticGraphProvider};
pub use types::{GraphData, NavigationIntent};
