pub mod charts;
pub mod popup;
pub mod tables;
pub mod world_map;
