//! Application layer for festcard.
//!
//! `FestSession` coordinates the session store and the profile generator to
//! implement login, persona selection, NFC taps and directory search.

pub mod fest_session;

pub use fest_session::FestSession;
