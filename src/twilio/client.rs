use crate::config::TwilioConfig;
use crate::CallSid;
use anyhow::{anyhow, Result};
use serde_json::Value;
use tracing::info;

const API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Authenticated client for the Twilio REST API, built once from validated
/// configuration at startup and injected into handlers through app state.
pub struct TwilioClient {
    http: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: Option<String>,
    base_url: String,
    api_base: String,
}

impl TwilioClient {
    /// Fails fast when the account SID or auth token is missing, so a
    /// misconfigured deployment never reaches per-request handling.
    pub fn new(config: &TwilioConfig) -> Result<Self> {
        let account_sid = config
            .account_sid
            .clone()
            .ok_or_else(|| anyhow!("Twilio account SID is not configured"))?;
        let auth_token = config
            .auth_token
            .clone()
            .ok_or_else(|| anyhow!("Twilio auth token is not configured"))?;
        Ok(Self {
            http: reqwest::Client::new(),
            account_sid,
            auth_token,
            from_number: config.phone_number.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_base: API_BASE.to_string(),
        })
    }

    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    /// The URL Twilio will request TwiML from once an outbound call connects.
    pub fn outbound_callback_url(&self) -> String {
        format!("{}/api/voice/outbound-call", self.base_url)
    }

    /// Resolves the origin number for an outbound call, falling back to the
    /// configured default when the caller did not supply one.
    pub fn resolve_origin(&self, from: Option<&str>) -> Result<String> {
        from.map(str::to_string)
            .or_else(|| self.from_number.clone())
            .ok_or_else(|| anyhow!("no origin number configured and no \"from\" supplied"))
    }

    /// Creates a call resource. At most one provider call per invocation,
    /// duplicate invocations produce duplicate calls.
    pub async fn create_call(&self, to: &str, from: Option<&str>) -> Result<CallSid> {
        let from = self.resolve_origin(from)?;
        let callback_url = self.outbound_callback_url();
        let url = format!("{}/Accounts/{}/Calls.json", self.api_base, self.account_sid);

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[
                ("To", to),
                ("From", from.as_str()),
                ("Url", callback_url.as_str()),
                ("Method", "POST"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await?;
        if !status.is_success() {
            return Err(anyhow!("{}", provider_message(&body)));
        }

        let sid = body
            .get("sid")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("Twilio response missing call sid"))?;
        info!(call_sid = sid, to = %to, from = %from, "outbound call created");
        Ok(sid.to_string())
    }

    /// Fetches call metadata by SID.
    pub async fn fetch_call(&self, call_sid: &str) -> Result<Value> {
        self.get_json(&format!(
            "{}/Accounts/{}/Calls/{}.json",
            self.api_base, self.account_sid, call_sid
        ))
        .await
    }

    /// Lists recordings attached to a call.
    pub async fn list_recordings(&self, call_sid: &str) -> Result<Value> {
        self.get_json(&format!(
            "{}/Accounts/{}/Recordings.json?CallSid={}",
            self.api_base, self.account_sid, call_sid
        ))
        .await
    }

    /// Lists transcriptions of a recording.
    pub async fn list_transcriptions(&self, recording_sid: &str) -> Result<Value> {
        self.get_json(&format!(
            "{}/Accounts/{}/Recordings/{}/Transcriptions.json",
            self.api_base, self.account_sid, recording_sid
        ))
        .await
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        let response = self
            .http
            .get(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .send()
            .await?;
        let status = response.status();
        let body: Value = response.json().await?;
        if !status.is_success() {
            return Err(anyhow!("{}", provider_message(&body)));
        }
        Ok(body)
    }
}

fn provider_message(body: &Value) -> &str {
    body.get("message")
        .and_then(Value::as_str)
        .unwrap_or("Twilio API error")
}
