//! Class schedule model.

pub mod types;

pub use types::{classes_today, next_class_today, ClassError, ClassInfo, Destination};
