pub mod entities;
pub mod physics;
pub mod world;
