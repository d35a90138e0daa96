//! # Typed Module
//!
//! Handler signature and the response builder that enforces each route's declared
//! responses.
//!
//! ## Overview
//!
//! A handler receives three things for every request that passed validation:
//!
//! - [`ValidatedInput`](crate::validator::ValidatedInput) with the coerced values
//! - a [`ResponseBuilder`] bound to the route
//! - a [`Next`] continuation for declining the request
//!
//! The builder only produces a [`TypedResponse`] when the status is declared, the
//! content type is declared for that status, and the payload validates against the
//! declared schema. Anything else is a
//! [`ResponseContractViolation`](crate::error::ResponseContractViolation), a server-side
//! defect distinct from client validation errors.
//!
//! ## Usage
//!
//! ```rust,ignore
//! factory.register(spec, |input, res, _next| {
//!     let params: ArticleParams = input.path_params()?;
//!     Ok(res.ok(&load_article(&params.slug)?)?.into())
//! })?;
//! ```
//!
//! Payload checks can be switched off with
//! [`ValidationConfig::validate_responses`](crate::config::ValidationConfig);
//! status and content type are always enforced.

mod core;
#[cfg(test)]
mod tests;

pub use core::{Handler, HandlerResult, Next, Reply, ResponseBuilder, TypedResponse};
