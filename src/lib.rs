//! Tom and Jerry: a cat chases a mouse through a maze of sliding walls on an
//! 84×48 monochrome handheld.
//!
//! The library holds the whole simulation; the binary wires it to a terminal.

pub mod clock;
pub mod collision;
pub mod compute;
pub mod config;
pub mod debounce;
pub mod entities;
pub mod error;
pub mod framebuffer;
pub mod motion;
pub mod pickups;
pub mod render;
