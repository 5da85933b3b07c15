//! Business logic for the upload relay pipeline and playlist import.
//!
//! Services sit between the HTTP controllers / bot command handlers and the
//! outside world (Discord API, YouTube API, filesystem). The pipeline pieces
//! are deliberately separable: the relay talks to Discord, the formatter is
//! pure, and the workspace registry owns filesystem lifecycle.

pub mod format;
pub mod playlist;
pub mod relay;
pub mod workspace;
