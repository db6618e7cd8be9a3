//! Typed TwiML construction.
//!
//! A [`VoiceResponse`] is an ordered list of verbs serialized by a single
//! pure formatter, so call-flow logic can be tested without an HTTP layer.

const VOICE: &str = "alice";

#[derive(Debug, Clone, PartialEq)]
pub enum Verb {
    Say {
        voice: String,
        text: String,
    },
    Gather {
        num_digits: u32,
        action: String,
        method: String,
    },
    Dial {
        number: String,
    },
    Record {
        action: String,
        max_length: u32,
        finish_on_key: String,
    },
    Redirect {
        url: String,
    },
    Conference {
        room: String,
        start_conference_on_enter: bool,
        end_conference_on_exit: bool,
        wait_url: String,
        wait_method: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoiceResponse {
    verbs: Vec<Verb>,
}

impl VoiceResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn say(mut self, text: &str) -> Self {
        self.verbs.push(Verb::Say {
            voice: VOICE.to_string(),
            text: text.to_string(),
        });
        self
    }

    pub fn gather(mut self, num_digits: u32, action: &str, method: &str) -> Self {
        self.verbs.push(Verb::Gather {
            num_digits,
            action: action.to_string(),
            method: method.to_string(),
        });
        self
    }

    pub fn dial(mut self, number: &str) -> Self {
        self.verbs.push(Verb::Dial {
            number: number.to_string(),
        });
        self
    }

    pub fn record(mut self, action: &str, max_length: u32, finish_on_key: &str) -> Self {
        self.verbs.push(Verb::Record {
            action: action.to_string(),
            max_length,
            finish_on_key: finish_on_key.to_string(),
        });
        self
    }

    pub fn redirect(mut self, url: &str) -> Self {
        self.verbs.push(Verb::Redirect {
            url: url.to_string(),
        });
        self
    }

    pub fn conference(
        mut self,
        room: &str,
        start_conference_on_enter: bool,
        end_conference_on_exit: bool,
        wait_url: &str,
    ) -> Self {
        self.verbs.push(Verb::Conference {
            room: room.to_string(),
            start_conference_on_enter,
            end_conference_on_exit,
            wait_url: wait_url.to_string(),
            wait_method: "GET".to_string(),
        });
        self
    }

    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><Response>"#);
        for verb in &self.verbs {
            match verb {
                Verb::Say { voice, text } => {
                    xml.push_str(&format!(
                        r#"<Say voice="{}">{}</Say>"#,
                        escape_xml(voice),
                        escape_xml(text)
                    ));
                }
                Verb::Gather {
                    num_digits,
                    action,
                    method,
                } => {
                    xml.push_str(&format!(
                        r#"<Gather numDigits="{}" action="{}" method="{}"/>"#,
                        num_digits,
                        escape_xml(action),
                        escape_xml(method)
                    ));
                }
                Verb::Dial { number } => {
                    xml.push_str(&format!(r#"<Dial>{}</Dial>"#, escape_xml(number)));
                }
                Verb::Record {
                    action,
                    max_length,
                    finish_on_key,
                } => {
                    xml.push_str(&format!(
                        r#"<Record action="{}" maxLength="{}" finishOnKey="{}"/>"#,
                        escape_xml(action),
                        max_length,
                        escape_xml(finish_on_key)
                    ));
                }
                Verb::Redirect { url } => {
                    xml.push_str(&format!(r#"<Redirect>{}</Redirect>"#, escape_xml(url)));
                }
                Verb::Conference {
                    room,
                    start_conference_on_enter,
                    end_conference_on_exit,
                    wait_url,
                    wait_method,
                } => {
                    xml.push_str(&format!(
                        r#"<Dial><Conference startConferenceOnEnter="{}" endConferenceOnExit="{}" waitUrl="{}" waitMethod="{}">{}</Conference></Dial>"#,
                        start_conference_on_enter,
                        end_conference_on_exit,
                        escape_xml(wait_url),
                        escape_xml(wait_method),
                        escape_xml(room)
                    ));
                }
            }
        }
        xml.push_str("</Response>");
        xml
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
