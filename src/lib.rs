//! cinebot - a webhook-driven movie lookup bot
//!
//! Free text is matched against a title to link catalogue fetched on every
//! query; one admin can list known users and broadcast to all of them.

pub mod domain;
pub mod application;
pub mod infrastructure;
