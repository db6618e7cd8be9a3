//! Call-flow stages, each a pure function from the current request's input
//! to a [`VoiceResponse`]. All call "state" lives in which webhook path
//! Twilio invokes next, mirrored by the URLs embedded in the responses.

use crate::config::TwilioConfig;
use crate::twilio::VoiceResponse;

pub const INCOMING_PATH: &str = "/api/voice/incoming";
pub const MENU_PATH: &str = "/api/voice/menu";
pub const RECORDING_PATH: &str = "/api/voice/recording";

const CONFERENCE_ROOM: &str = "MyConference";
const HOLD_MUSIC_URL: &str = "https://twimlets.com/holdmusic?Bucket=com.twilio.music.classical";

/// Greets the caller and gathers one digit. When nothing is gathered Twilio
/// falls through to the redirect and replays this stage; the loop is
/// unbounded by design, the gather timeout is the only exit.
pub fn incoming() -> VoiceResponse {
    VoiceResponse::new()
        .say(
            "Welcome to the Twilio Voice API demo. Press 1 for sales, \
             press 2 for support, or press 3 to leave a message.",
        )
        .gather(1, MENU_PATH, "POST")
        .redirect(INCOMING_PATH)
}

/// Routes the gathered digit. Total over every possible input: anything
/// other than "1", "2" or "3" takes the apology branch back to the menu.
pub fn menu(digits: Option<&str>, twilio: &TwilioConfig) -> VoiceResponse {
    match digits {
        Some("1") => VoiceResponse::new()
            .say("Connecting you to our sales department.")
            .dial(&twilio.sales_number),
        Some("2") => VoiceResponse::new()
            .say("Connecting you to our support team.")
            .dial(&twilio.support_number),
        Some("3") => VoiceResponse::new()
            .say("Please leave a message after the beep. Press pound when finished.")
            .record(RECORDING_PATH, 30, "#"),
        _ => VoiceResponse::new()
            .say("Sorry, I didn't understand your selection.")
            .redirect(INCOMING_PATH),
    }
}

/// Terminal stage after a recording completes.
pub fn recording() -> VoiceResponse {
    VoiceResponse::new().say(
        "Thank you for your message. Our team will get back to you soon. Goodbye!",
    )
}

/// TwiML leg of an outbound call, requested by Twilio once the callee answers.
pub fn outbound_call() -> VoiceResponse {
    VoiceResponse::new().say(
        "This is an automated call from our Twilio Voice API demo. Thank you for answering!",
    )
}

/// Drops the caller into the shared conference room. The conference starts
/// when the first participant enters and survives this participant leaving.
pub fn conference() -> VoiceResponse {
    VoiceResponse::new()
        .say("You are joining the conference. Please wait for others to join.")
        .conference(CONFERENCE_ROOM, true, false, HOLD_MUSIC_URL)
}
