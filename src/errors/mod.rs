pub mod types;

pub use types::SmugglerError;
