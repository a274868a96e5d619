pub mod api;
pub mod audit;
pub mod canvas;
pub mod collab;
pub mod config;
pub mod error;
pub mod guidelines;
pub mod optimizer;
pub mod rules;
pub mod scorer;

pub use api::ComplianceEngine;
pub use canvas::{Layout, Rgb, TextBlock};
pub use error::{AdResult, CreativeError};
