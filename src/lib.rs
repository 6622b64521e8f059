//! A small blog and project showcase: flat JSON collections, an in-memory
//! admin session table, and server-rendered pages on poem.

pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod services;
pub mod session;
pub mod store;
pub mod web;
