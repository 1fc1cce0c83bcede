pub mod app;
pub mod audio;
pub mod error;
pub mod metadata;
pub mod player;
pub mod playlist;
