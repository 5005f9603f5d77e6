pub mod agent;
pub mod constants;
pub mod environment;
pub mod input;
pub mod lifecycle;
pub mod math;
pub mod physics;
pub mod replica;
pub mod room;
pub mod snake;
pub mod types;
pub mod world;
