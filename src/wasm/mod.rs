//! WebAssembly bindings for the libavr simulator.
//!
//! This module provides JavaScript-callable interfaces to the AVR core,
//! enabling browser-based stepping of firmware images.

pub mod api;

pub use api::AvrEmulator;
