//! Send a letter to Santa through emailSanta.com's reply generator and read his
//! reply as plain text.
//!
//! ```no_run
//! use emailsanta::{FetcherConfig, NewLetter, ReplyFetcher};
//!
//! # fn main() -> anyhow::Result<()> {
//! let letter = NewLetter::new("Alex", 2, 9.0, "Springfield", "USA", 3, ["bike", "lego", "book"])
//!     .with_comment("I helped with the dishes")
//!     .validate()?;
//! let reply = ReplyFetcher::new(FetcherConfig::default())?.fetch(&letter)?;
//! println!("{}", reply.text());
//! # Ok(())
//! # }
//! ```

pub mod cfemail;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod form;
pub mod letter;
pub mod remote;

pub use crate::{
    config::FetcherConfig,
    error::{LetterError, LetterErrorKind, SubmitError},
    fetcher::{Reply, ReplyFetcher},
    letter::{Letter, NewLetter},
};
