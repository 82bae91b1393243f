pub mod config;
pub mod error;
pub mod game_loop;
pub mod scoreboard;
pub mod session;
