//! A personal expense tracker.
//!
//! Each user has a list of expenses, an income and a budget limit, all kept in a string-keyed
//! store. A `Session` loads them once and persists the whole list after every change. The
//! `ledger` functions filter and total a list without touching storage.

pub mod args;
mod backup;
pub mod commands;
mod config;
mod error;
pub mod ledger;
pub mod model;
mod session;
pub mod store;
mod utils;

#[cfg(test)]
mod test;

pub use backup::Backup;
pub use config::Config;
pub use error::{Error, ErrorType, Result};
pub use session::{FormMode, Session, Submission};
