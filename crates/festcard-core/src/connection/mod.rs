//! Connection domain module.
//!
//! - `model`: `Connection` slots and their `ConnectionId`
//! - `book`: `ConnectionBook`, the ordered per-user collection

mod book;
mod model;

pub use book::ConnectionBook;
pub use model::{
    Connection, ConnectionId, FAILED_NAME, INTERRUPTED_REASON, PENDING_BIO, PENDING_NAME,
};
