//! HTTP handlers

pub mod audio;
pub mod calls;
pub mod health;
pub mod notify;
