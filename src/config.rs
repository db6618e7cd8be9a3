use anyhow::Error;
use clap::Parser;
use serde::Deserialize;
use std::env;

#[derive(Parser, Debug)]
#[command(version)]
pub struct Cli {
    #[clap(long, default_value = "voicehook.toml")]
    pub conf: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http_addr: String,
    pub log_level: Option<String>,
    pub log_file: Option<String>,
    pub twilio: TwilioConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TwilioConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    /// Externally reachable base URL, used to rebuild the exact URL Twilio
    /// signed and as the callback base for outbound calls.
    pub base_url: String,
    /// Default origin number for outbound calls.
    pub phone_number: Option<String>,
    pub sales_number: String,
    pub support_number: String,
    /// Development escape hatch, never enable in production.
    pub skip_validation: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:3000".to_string(),
            log_level: Some("info".to_string()),
            log_file: None,
            twilio: TwilioConfig::default(),
        }
    }
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            base_url: "http://localhost:3000".to_string(),
            phone_number: None,
            sales_number: "+15551234567".to_string(),
            support_number: "+15557654321".to_string(),
            skip_validation: false,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, Error> {
        let config = toml::from_str(
            &std::fs::read_to_string(path).map_err(|e| anyhow::anyhow!("{}: {}", e, path))?,
        )?;
        Ok(config)
    }

    /// Environment variables win over the config file, matching the original
    /// deployment convention of configuring secrets through the environment.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = env::var("PORT") {
            self.http_addr = format!("0.0.0.0:{}", port);
        }
        if let Ok(sid) = env::var("TWILIO_ACCOUNT_SID") {
            self.twilio.account_sid = Some(sid);
        }
        if let Ok(token) = env::var("TWILIO_AUTH_TOKEN") {
            self.twilio.auth_token = Some(token);
        }
        if let Ok(number) = env::var("TWILIO_PHONE_NUMBER") {
            self.twilio.phone_number = Some(number);
        }
        if let Ok(url) = env::var("BASE_URL") {
            self.twilio.base_url = url;
        }
        if let Ok(number) = env::var("SALES_PHONE_NUMBER") {
            self.twilio.sales_number = number;
        }
        if let Ok(number) = env::var("SUPPORT_PHONE_NUMBER") {
            self.twilio.support_number = number;
        }
        if let Ok(flag) = env::var("SKIP_TWILIO_VALIDATION") {
            self.twilio.skip_validation = flag == "true";
        }
        self
    }
}
