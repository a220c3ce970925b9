// Genmark: text-to-image generation with watermark stamping

pub mod config;
pub mod generator;
pub mod logging;
pub mod watermark;
