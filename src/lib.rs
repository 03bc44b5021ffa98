//! Quote storage core and command layer for an IRC bot.
//!
//! The bot framework itself stays external: it parses lines, decides which
//! command fired and who said it, then calls into the [`commands::Router`]
//! here. Everything below that - the quotes table, its soft-delete
//! semantics, the one-active-quote-per-key invariant - lives in
//! [`store::QuoteStore`].

pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod store;

pub use commands::{Invocation, Router};
pub use config::QuotesConfig;
pub use error::{StoreError, StoreResult};
pub use models::quotes::QuoteRecord;
pub use store::{AddOutcome, QuoteStore};
