mod canvas;
mod component;
mod edges;
mod error;
mod filter;
mod geometry;
mod legend;
mod minimap;
mod model;
mod nodes;
mod render;
mod scene;
mod state;
mod theme;
mod toolbar;
mod types;

#[cfg(test)]
mod tests;

pub use component::FlowDiagram;
pub use error::DiagramError;
pub use types::DiagramDefinition;
