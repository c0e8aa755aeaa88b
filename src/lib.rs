pub mod error;
pub mod geometry;
pub mod grid;
pub mod profile;
pub mod render;
pub mod request;
pub mod sheet;
pub mod solver;
pub mod types;
