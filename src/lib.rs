//! Terminal client for composing and submitting home-renovation quote
//! requests: a three-step wizard over a validated, autosaved draft,
//! posted to a third-party form backend.

pub mod api;
pub mod app;
pub mod config;
pub mod draft;
pub mod logging;
pub mod ui;
pub mod validate;
pub mod wizard;
