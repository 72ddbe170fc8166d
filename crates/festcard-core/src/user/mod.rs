//! User domain module.
//!
//! # Module Structure
//!
//! - `model`: the `User` session record and its `Afterparty` digest
//! - `store`: `SessionStore` / `AccountStore` persistence contracts

mod model;
mod store;

pub use model::{Afterparty, User};
pub use store::{AccountStore, SessionStore};
