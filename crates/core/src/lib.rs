//! Core library: configuration, chunk models, the concept taxonomy, and the
//! two exporters (bulk table dump and query-driven search dump).

pub mod config;
pub mod embeddings;
pub mod export;
pub mod fetch;
pub mod grouping;
pub mod models;
pub mod pipeline;
pub mod scan;
pub mod search;
pub mod store;
pub mod taxonomy;
