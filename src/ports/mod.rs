//! Port traits: the seams between the pipeline and the outside world.

pub mod config_port;
pub mod provider_port;
pub mod store_port;
