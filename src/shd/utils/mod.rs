// Utilities and helper functions

pub mod misc;
