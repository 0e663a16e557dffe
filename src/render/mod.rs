mod interpolator;
mod transform;
mod view;

pub use transform::eci_to_render;
pub use view::{follow, ObjectSample, SceneView};
