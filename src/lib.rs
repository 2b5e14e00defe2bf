//! Single-screen arcade shooter.
//!
//! The library is the simulation core plus the narrow interfaces the
//! terminal frontend in `main.rs` talks to: input goes in through
//! [`game::handle_input`], time through [`compute::tick`] and
//! [`compute::advance_clock`], and frames come out of [`render::snapshot`].

pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod game;
pub mod render;
pub mod schedule;
pub mod spawner;
pub mod storage;
