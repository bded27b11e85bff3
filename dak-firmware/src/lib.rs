#![no_std]
pub mod catalog;
pub mod clock;
pub mod debounce;
pub mod hid;
pub mod indicator;
pub mod keyboard;
pub mod layers;
pub mod layouts;
pub mod matrix;
pub mod register;
pub mod resolver;
pub mod settings;

#[macro_use]
mod macros;
