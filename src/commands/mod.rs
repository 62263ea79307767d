//! Command implementations for the FantasyWear CLI

pub mod accounts;
pub mod common;
pub mod leagues;
pub mod login;
pub mod run;
pub mod sync;

pub use common::{AppContext, LocalWearable};
