pub mod body;
pub mod camera;
pub mod clock;
pub mod color;
pub mod config;
pub mod controller;
pub mod drawing;
pub mod rendering;
pub mod space;
pub mod world;
