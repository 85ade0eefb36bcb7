//! Application services

pub mod corix;

pub use corix::{CorixService, SelectionSummary};
