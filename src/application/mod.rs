pub mod cluster_markets;
pub mod clustering;
pub mod signals;
