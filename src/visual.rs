pub mod canvas;
pub mod engine;
pub mod glow;
pub mod gradient;
pub mod scene;
pub mod strip;

pub use engine::VisualEngine;
pub use scene::StripScene;
