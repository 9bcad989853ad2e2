//! VMDeck Backend Library
//!
//! Session-authenticated access to per-user VM records. Exposes the auth
//! core, the inventory repository and the router for the binary and tests.

pub mod api;
pub mod auth;
pub mod config;
pub mod inventory;
pub mod middleware;
pub mod server;
