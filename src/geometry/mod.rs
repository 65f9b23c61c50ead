//! Solid geometry the fluid is coupled with.

pub mod objects;

pub use objects::{BoxObject, Contact, ObjectSet, ObjectShape, SolidObject, SphereObject};
