pub mod client;
pub mod twiml;
pub mod validate;

pub use client::TwilioClient;
pub use twiml::VoiceResponse;
