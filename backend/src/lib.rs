//! Foodgram backend library: domain model, HTTP adapter and outbound
//! adapters for the recipe-sharing API.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use middleware::Trace;
