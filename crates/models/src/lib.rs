//! Domain types shared by the store backends and the HTTP layer.

pub mod record;

pub use record::Record;
