pub mod quiz;
pub mod selection;
pub mod timer;
