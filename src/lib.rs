//! # Result Manager
//!
//! Typed success/failure outcomes for request-handling code, backed by a
//! pluggable, localizable error catalog.
//!
//! ## Design Philosophy
//!
//! 1. **Expected failures are values**, not panics or early returns with ad-hoc
//!    strings
//! 2. **Every code maps to a stable classification URI** and a message
//!    template, through one [`ErrorResolver`]
//! 3. **Call sites never see the resolution mechanism**: in-memory, localized
//!    or custom resolvers are swapped at construction time
//! 4. **Contract violations are not domain failures**: a null or blank
//!    argument is an `Err`, never an [`Outcome::Failure`]
//!
//! ## Layout
//!
//! - [`codes`] / [`definitions`]: error codes, classifications and the catalog
//! - [`resolver`]: `classify` (sync) and `format` (async, cancellable)
//! - [`models`]: [`ErrorValue`], [`Outcome`], [`TypedOutcome`]
//! - [`builders`]: one constructor per failure category on [`ResultManager`]
//! - [`translation`]: the translator capability used for localized templates
//!
//! ## Quick Start
//!
//! ```rust
//! use result_manager::{RequestContext, ResultManager, TypedOutcome, keys};
//!
//! #[derive(Debug)]
//! struct User;
//!
//! async fn find_user(manager: &ResultManager, ctx: &RequestContext, id: &str) -> result_manager::Result<TypedOutcome<User>> {
//!     // lookup elided
//!     manager.resource_not_found_typed(ctx, "User", "Id", id).await
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> result_manager::Result<()> {
//! let manager = ResultManager::default();
//! let ctx = RequestContext::new("0HN1-trace");
//!
//! let outcome = find_user(&manager, &ctx, "42").await?;
//! let error = outcome.error().unwrap();
//!
//! assert_eq!(error.to_string(), "User with Id '42' was not found (E-PRB-300)");
//! assert_eq!(error.context().get_str(keys::TRACE_ID), Some("0HN1-trace"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Localized Messages
//!
//! ```rust
//! use std::sync::Arc;
//! use result_manager::{InMemoryTranslator, RequestContext, ResultManager, TranslatorOptions};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> result_manager::Result<()> {
//! let translator = Arc::new(
//!     InMemoryTranslator::with_builtin_templates(TranslatorOptions::default())
//!         .with_table("fr", [("problem.forbidden", "Action non autorisée.")]),
//! );
//!
//! let manager = ResultManager::localized(translator);
//! let ctx = RequestContext::detached().with_locale("fr");
//! let outcome = manager.forbidden(&ctx).await?;
//! assert_eq!(outcome.error().unwrap().description(), "Action non autorisée.");
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]

pub mod builders;
pub mod codes;
pub mod context;
pub mod definitions;
pub mod error;
pub mod logging;
pub mod manager;
pub mod models;
pub mod resolver;
pub mod template;
pub mod translation;
pub mod validation;

pub use builders::*;
pub use codes::*;
pub use context::*;
pub use definitions::*;
pub use error::*;
pub use logging::*;
pub use manager::*;
pub use models::*;
pub use resolver::*;
pub use translation::*;
pub use validation::*;

/// Result of a builder call.
pub type Result<T> = std::result::Result<T, BuildError>;
