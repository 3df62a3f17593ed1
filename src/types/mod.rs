//! Core type definitions: conversation turns, tool contracts, stream events.

pub mod events;
pub mod message;
pub mod tool;
