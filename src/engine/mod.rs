// Engine modules: assets, rendering, input, page scrolling, timing

pub mod assets;
pub mod controls;
pub mod frame_clock;
pub mod input;
pub mod renderer;
pub mod scroll;
