pub mod client;
pub mod interface;

pub use client::DetectionClient;
pub use interface::{Detection, DetectionInterface, DetectionResult};
