pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod demo;
pub mod global;
pub mod launcher;
pub mod operation;
pub mod stream;
