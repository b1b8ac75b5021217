//! Core types and the pairing/progress engine for Duet.
//!
//! A single rater scores every unordered pair of catalog items on a 1–5
//! scale. Answers live in an append-only [`log::AnswerLog`]; everything else
//! (remaining pairs, anchor, progress) is derived from it on each read.
//!
//! This crate is free of HTTP and database dependencies. Storage backends
//! implement [`log::AnswerLog`]; the presentation layer drives a
//! [`session::Session`].

pub mod answer;
pub mod catalog;
pub mod error;
pub mod log;
pub mod pair;
pub mod reader;
pub mod remaining;
pub mod scheduler;
pub mod session;

pub use error::{Error, Result};
