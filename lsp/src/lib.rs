//! Language server for Tantrums: publishes lint diagnostics for open documents.

pub mod analyzer;
mod server;

pub use server::run;
