#![forbid(unsafe_code)]

//! Domain model and pure rules for the driving-education course: lessons and
//! their content variants, learner accounts, the built-in catalog, and the
//! pass/promotion rule tables. Persistence and orchestration live in the
//! `storage` and `services` crates.

pub mod catalog;
pub mod model;
pub mod rules;
pub mod time;

pub use catalog::{Catalog, CatalogError};
pub use time::Clock;
