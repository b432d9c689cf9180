pub mod backend;
pub mod geometry;
pub mod program;
pub mod recording;
pub mod renderer;
