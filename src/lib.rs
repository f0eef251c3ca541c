//! Verse alignment and correction pipeline.
//!
//! Two independent batch passes over static JSON data:
//!
//! - **locate**: find each reference verse inside noisy, extracted page text
//!   and emit a `chapter:verse -> snippet` map for human review;
//! - **merge**: overwrite verses of the page-organized translation dataset
//!   with a verse-indexed correction source, touching only shared keys.
//!
//! Both passes share one data convention: chapter id -> verse id -> text,
//! with ids canonicalized at the boundary (see [`model::key`]).

pub mod cli;
pub mod error;
pub mod logging;
pub mod model;
pub mod protocol;
pub mod services;

pub use error::{AlignError, Result};
