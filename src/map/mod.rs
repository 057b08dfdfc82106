mod geometry;
mod layer;
mod projection;
mod renderer;

pub use layer::{CasualtyLayer, Layer, Marker};
pub use projection::Viewport;
pub use renderer::{DisplaySettings, LineString, Lod, MapLayers, MapRenderer};
