pub mod api;
pub mod banner;
pub mod client;
pub mod commands;
pub mod completion;
pub mod config;
pub mod consts;
pub mod conversation;
pub mod prompts;
pub mod spinner;
pub mod tasks;
pub mod upload;
