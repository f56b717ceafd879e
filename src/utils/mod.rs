pub mod ansi;

pub use ansi::strip_ansi;
