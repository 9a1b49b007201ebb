//! Parlance application: domain handlers and session orchestration.
//!
//! This crate wires the `parlance-core` pipeline stages together: the
//! [`HandlerRegistry`](domains::HandlerRegistry) maps each intent kind to
//! its domain handler, [`CommandPipeline`](pipeline::CommandPipeline)
//! sequences one command through the stages inside the session's exclusion
//! scope, and [`CommandService`](facade::CommandService) is the contract the
//! route layer consumes.

pub mod domains;
pub mod facade;
pub mod pipeline;

pub use domains::{DomainHandler, HandlerRegistry};
pub use facade::{CommandService, ProcessCommandRequest};
pub use pipeline::CommandPipeline;
