//! Book inventory service.
//!
//! `app` wires the support crates together; `modules` holds the domain code.

pub mod app;
pub mod modules;

pub use app::{migrate, serve, Application};
