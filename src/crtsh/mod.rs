// src/crtsh/mod.rs
pub mod client;
pub mod decoder;

pub use client::CrtShClient;
pub use decoder::{decode_concatenated, Decoded, StreamEnd};
