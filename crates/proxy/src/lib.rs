//! Printify catalog proxy library.
//!
//! This crate provides the proxy as a library, allowing the router to be
//! tested and embedded without the binary's startup code.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod printify;
pub mod routes;
pub mod services;
pub mod state;
