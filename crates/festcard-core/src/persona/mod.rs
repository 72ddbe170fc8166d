//! Persona domain module.
//!
//! # Usage
//!
//! ```
//! use festcard_core::persona::Persona;
//!
//! assert!(!Persona::SELECTABLE.contains(&Persona::Celebrity));
//! ```

mod model;

pub use model::Persona;
