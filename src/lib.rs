// Library surface for headless/integration tests and reuse.
// The ratatui view layer lives with the binary; everything the game
// engine needs is exposed here.
pub mod config;
pub mod engine;
pub mod feed;
pub mod runtime;
pub mod score;
pub mod scoreboard;
pub mod stages;
pub mod timer;
pub mod util;
pub mod wave;
