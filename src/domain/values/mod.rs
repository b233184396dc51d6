pub mod cluster_config;
pub mod event_volume_gates;
pub mod platform;
pub mod similarity_threshold;
