//! cc-bridge: chat commands that forward prompts to a remote task API.
//!
//! The bridge keeps one rolling "last session" pointer so consecutive
//! `/cc` prompts continue the same remote conversation, and offers
//! sub-commands to list, show, reset and resume sessions.

pub mod api;
pub mod build_info;
pub mod client;
pub mod command;
pub mod config;
pub mod plugin;
pub mod session;
pub mod tools;
