//! HTTP inbound adapter exposing the REST API.
//!
//! Handlers depend only on the driving ports bundled in [`state::HttpState`];
//! request parsing failures and domain errors share one JSON envelope.

pub mod auth;
pub mod catalogue;
pub mod error;
pub mod health;
pub mod membership;
pub mod recipe_dto;
pub mod recipes;
pub mod session;
pub mod session_config;
pub mod shopping_list;
pub mod short_links;
pub mod state;
pub mod subscriptions;
#[cfg(test)]
pub mod test_utils;
pub mod user_dto;
pub mod users;
pub mod validation;

pub use error::ApiResult;
