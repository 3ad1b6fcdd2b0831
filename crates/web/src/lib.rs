//! Search page for The Cortex: static page, remote API proxy, HTML fragments.

pub mod remote;
pub mod render;
pub mod server;
