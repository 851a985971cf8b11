//! GPA and semester normalization engine for student transcripts
//!
//! This crate turns raw grade records, as exported by a university grade
//! portal, into GPA figures on the 4-point and 10-point scales. It cleans
//! loosely typed scores, keeps non-credit courses out of the average,
//! deduplicates retakes, normalizes and orders free-text semester labels,
//! and exposes the results over an axum HTTP API.

#![warn(missing_docs)]

pub mod access;
pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
