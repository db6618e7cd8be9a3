use base64::engine::{general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Builds the string Twilio signs for a webhook request: the full callback
/// URL followed by every POST parameter key and value, sorted by key in
/// ASCII order, with no separators.
pub fn canonical_string(url: &str, params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let mut data = String::from(url);
    for (key, value) in sorted {
        data.push_str(key);
        data.push_str(value);
    }
    data
}

/// Computes the base64-encoded HMAC-SHA1 signature Twilio would attach to a
/// request for `url` with body `params`, keyed by the account auth token.
pub fn compute_signature(auth_token: &str, url: &str, params: &[(String, String)]) -> String {
    let mut mac = match HmacSha1::new_from_slice(auth_token.as_bytes()) {
        Ok(mac) => mac,
        // HMAC accepts keys of any length, this branch is unreachable.
        Err(_) => return String::new(),
    };
    mac.update(canonical_string(url, params).as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Checks a declared `X-Twilio-Signature` value against the signature we
/// compute from the reconstructed URL and body parameters. The comparison
/// goes through `Mac::verify_slice` so it is constant-time; a signature that
/// is not valid base64 is rejected outright.
pub fn validate_request(
    auth_token: &str,
    signature: &str,
    url: &str,
    params: &[(String, String)],
) -> bool {
    let declared = match STANDARD.decode(signature) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let mut mac = match HmacSha1::new_from_slice(auth_token.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(canonical_string(url, params).as_bytes());
    mac.verify_slice(&declared).is_ok()
}
