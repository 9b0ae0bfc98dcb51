//! Audible alarm
//!
//! [`AlarmController`] runs the player in a loop for as long as the store
//! reports unacknowledged firing alerts. Players live in [`player`].

pub mod controller;
pub mod player;

pub use controller::AlarmController;
pub use player::{
    BellPlayer, CommandPlayer, Playback, SoundPlayer, detect_player, detect_player_in, find_program,
    find_program_in,
};
