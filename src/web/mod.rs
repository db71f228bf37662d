//! The web viewer
//!
//! An actix-web presentation layer over the read-only results directory.

pub(crate) mod pages;
pub(crate) mod routes;
pub(crate) mod server;

pub(crate) use server::{AppState, run};
