// Core antitag module - mass-mention detection and enforcement.
// Same layout as the other core modules: models, pure helpers, service.

pub mod antitag_models;
pub mod antitag_service;
pub mod mention_extractor;
pub mod threshold;

pub use antitag_models::*;
pub use antitag_service::*;
