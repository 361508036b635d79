pub mod client;
pub mod types;

pub use client::PureFaClient;
pub use types::{Volume, VolumePerformance};
