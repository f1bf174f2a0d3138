pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod game_loop;
pub mod input;
