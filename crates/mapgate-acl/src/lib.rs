//! # mapgate-acl
//!
//! Resource-ownership access control for Mapgate.
//!
//! This crate decides whether a requester may read and/or write the
//! resources an operation's arguments point at:
//! - Ownership guards for data sources, maps and organisations
//! - Exhaustive guard dispatch by resource kind
//! - Declarative per-operation [`AccessPolicy`] values and TOML policy files
//! - The fail-closed [`Evaluator`]
//!
//! ```text
//! Evaluator ──→ check_argument_map ──→ check_guard ──→ *_guard ──→ Repository
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod arguments;
pub mod config;
pub mod dispatch;
pub mod enforcement;
pub mod error;
pub mod guard;
pub mod policy;


pub use arguments::Arguments;
pub use config::PolicyFile;
pub use dispatch::{check_argument_map, check_guard};
pub use enforcement::Evaluator;
pub use error::{Error, Result};
pub use policy::{AccessPolicy, ArgumentMap};
