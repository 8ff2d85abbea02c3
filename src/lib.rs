//! Audio-reactive scrolling gradient strips with a blurred glow, plus a
//! dominant-frequency detector.

pub mod audio;
pub mod config;
pub mod detector;
pub mod gui;
pub mod visual;
