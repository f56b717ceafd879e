pub mod decode;
pub mod supervisor;

pub use supervisor::{ProcessOutcome, ProcessSupervisor, Termination};
