pub mod cli;
pub mod commands;
pub mod doctor;
pub mod error;
pub mod logging;
pub mod paths;
pub mod profiles;
pub mod repository;
pub mod selection;
pub mod settings;
pub mod shell;
pub mod ui;

#[cfg(test)]
pub mod test_utils;
