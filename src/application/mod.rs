// Application layer - turns user input (flags, files) into invoices.
// The domain stays free of parsing and I/O concerns.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
