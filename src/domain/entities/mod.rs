pub mod cluster;
pub mod listing;
