//! Core library for Dietlog: anonymous cookie-identified sessions that
//! register a username and record meals, with a summary of the longest
//! consecutive run of on-diet meals.
//!
//! The crate is split along the request path: [`session`] resolves the
//! caller's identity, [`storage`] owns session-scoped meal access,
//! [`streak`] reduces an ordered meal list to adherence statistics, and
//! [`service`] orchestrates the three for each public operation.

pub mod config;
pub mod error;
pub mod model;
pub mod service;
pub mod session;
pub mod storage;
pub mod streak;

pub use error::{DietlogError, Result};
