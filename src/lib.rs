//! Library crate for fd-explorer-rs exposing reusable modules.
pub mod aggregate;
pub mod decode;
pub mod fdinfo;
pub mod pinger;
pub mod scanner;
pub mod summary;
pub mod types;
