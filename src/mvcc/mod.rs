pub mod snapshot;
pub mod publisher;
