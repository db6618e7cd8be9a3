pub mod app;
pub mod callflow;
pub mod config;
pub mod handler;
pub mod twilio;

pub type CallSid = String;
