//! Command-line front end for the immunization message validator.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
