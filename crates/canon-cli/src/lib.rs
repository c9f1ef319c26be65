//! Library components of the `canon` command-line driver.
//!
//! - [`logging`]: `tracing-subscriber` setup and row-value redaction
//! - [`input`]: reading JSON and CSV batches into rows

pub mod input;
pub mod logging;
