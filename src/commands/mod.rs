//! Command implementations for the drupal-composer-builder CLI

pub mod completions;
pub mod generate;
pub mod version;
