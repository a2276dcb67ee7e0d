pub mod corpus;
pub mod index_builder;
