pub mod document;
pub mod outline;
