//! Drawing layer: SVG scene graph, board geometry and painting

pub mod ids;
pub mod layout;
pub mod paint;
pub mod svg;

pub use layout::{BoardPoints, BoundingBox, Coord};
pub use svg::{ElementKind, Mutation, NodeId, SvgTree};
