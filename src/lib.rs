//! Nebula Conqueror: a side-scrolling shooter engine for a 20×4 character
//! display and a six-key matrix keypad.
//!
//! The library is hardware-agnostic. Boards (or the terminal front end in
//! `main.rs`) implement the traits in [`hal`] and drive [`game::Game::tick`]
//! from their main loop.

pub mod compute;
pub mod config;
pub mod entities;
pub mod game;
pub mod grid;
pub mod hal;
pub mod input;
pub mod render;
pub mod slots;
pub mod timer;
pub mod tone;
