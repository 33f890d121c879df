//! # tscat config
//!
//! Settings for the tscat catalog runtime: where catalogs live, how their
//! files are named, how duplicate keys are treated, and how logging is set
//! up.
//!
//! Settings are read from TOML, overridden from `TSCAT_*` environment
//! variables, validated, and published through a lock-free cache.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use cache::*;
pub use defaults::*;
pub use loader::*;
pub use schema::*;
pub use validator::*;
