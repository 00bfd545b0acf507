#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Pattern-based text extraction, frequency ranking and group substitution.
//!
//! The three primitives are independent and pure:
//! - [`extract`] scans a string for every non-overlapping match of a [`Pattern`]
//! - [`rank`] tallies values and orders them by descending count
//! - [`substitute`] rewrites matches through a [`SubstitutionTemplate`]

pub mod error;
pub mod pattern;
pub mod rank;
pub mod substitute;

pub use error::{Error, Result};
pub use pattern::{GroupId, Match, Matches, Pattern, PatternBuilder, extract, extract_values};
pub use rank::{FrequencyTable, Ranked, RankedList, rank};
pub use substitute::{SubstitutionTemplate, substitute, substitute_n, substitute_str};
