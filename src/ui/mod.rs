//! # User Interface
//!
//! Colored terminal output with clickable file links. Everything goes to
//! stderr so JSON exports on stdout stay machine-readable.

pub mod log;

pub use log::{debug, error, header, info, path_link, print_logo, success, warn, Log};
