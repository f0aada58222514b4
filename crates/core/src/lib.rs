#![deny(warnings)]

pub mod config;
pub mod document;
pub mod pipeline;
pub mod progress;
pub mod translate;
