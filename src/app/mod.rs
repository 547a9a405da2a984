// Application layer: wires the command line onto the content API.

#[cfg(feature = "cli")]
pub mod commands;
