//! Prompt composition and generation for marketing content.
//!
//! A [`wire::GenerationRequest`] is validated against the option
//! [`registry::Registry`], rendered by [`prompt::compose`], sent through a
//! [`provider::GenerationClient`] and recorded in the
//! [`history::SessionHistory`] of a [`session::Session`].

pub mod cli;
pub mod config;
pub mod context;
pub mod errors;
pub mod export;
pub mod history;
pub mod prompt;
pub mod provider;
pub mod registry;
pub mod session;
pub mod ux;
pub mod wire;
