pub mod calendars;
pub mod config;
pub mod lights;
pub mod reconcile;
pub mod status;
