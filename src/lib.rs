//! Weekly schedule management for professionals
//!
//! The core of the crate is [`interactive::ScheduleEntryDialog`], a form for creating
//! or editing one entry of a professional's weekly schedule. Around it sit the
//! activity-type directory client, a short-lived options cache, a local schedule
//! store and a terminal grid that hosts the dialog.

pub mod cache;
pub mod config;
pub mod directory;
pub mod error;
pub mod interactive;
pub mod logging;
pub mod schedule;
