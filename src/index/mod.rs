pub mod posting;
pub mod registry;
pub mod term_store;
