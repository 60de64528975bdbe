//! CLI Commands

pub mod listen;
pub mod send;
