pub mod clock;
pub mod collision;
pub mod config;
pub mod controls;
pub mod error;
pub mod fruit;
pub mod grid;
pub mod input;
pub mod leaderboard;
pub mod lives;
pub mod renderer;
pub mod score;
pub mod session;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
