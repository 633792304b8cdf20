//! SiteControl CLI library.
//!
//! This crate provides the one-shot command-line interface and the
//! role-based interactive REPL over the site store.

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod render;
pub mod repl;
