pub mod generation;
pub mod neural;
