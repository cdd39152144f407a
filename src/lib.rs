//! brief-chat - terminal chat client for a research-brief backend
//!
//! The client keeps one session's conversation state, classifies each
//! submission (follow-up detection, research-depth inference), forwards it
//! to the backend's /brief endpoint, and renders the structured result.

pub mod classify;
pub mod client;
pub mod config;
pub mod render;
pub mod repl;
pub mod session;
