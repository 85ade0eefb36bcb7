//! Application layer: services and read-only tree consumers
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod inspector;
pub mod render;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use inspector::{inspect, ChildSummary, DetailBody, NodeDetails};
pub use render::{format_score, TreeRender};
