//! Classifies inbound SMS bodies into commands.
//!
//! Matching looks only at the leading characters of the trimmed, lower-cased
//! body, so `"Yes!!"` and `"yes please"` both confirm a save-the-date.

/// What a guest asked for in a text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SaveTheDate { confirmed: bool },
    Rsvp(RsvpCommand),
    /// Started with `rsvp` but did not follow the grammar.
    RsvpMalformed,
    /// Carries the full body, which replaces the guest's notes.
    OptOut { body: String },
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RsvpCommand {
    Accept { count: u32, note: String },
    /// `note` is the entire body, `rsvp no` included.
    Decline { note: String },
}

impl Command {
    pub fn parse(body: &str) -> Command {
        let body = body.trim().to_lowercase();

        if leading(&body, 3) == "yes" {
            Command::SaveTheDate { confirmed: true }
        } else if leading(&body, 2) == "no" {
            Command::SaveTheDate { confirmed: false }
        } else if leading(&body, 4) == "rsvp" {
            parse_rsvp(&body)
        } else if leading(&body, 4) == "stop" {
            Command::OptOut { body }
        } else {
            Command::Unrecognized
        }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::SaveTheDate { confirmed: true } => "save_the_date_confirm",
            Command::SaveTheDate { confirmed: false } => "save_the_date_decline",
            Command::Rsvp(RsvpCommand::Accept { .. }) => "rsvp_accept",
            Command::Rsvp(RsvpCommand::Decline { .. }) => "rsvp_decline",
            Command::RsvpMalformed => "rsvp_malformed",
            Command::OptOut { .. } => "opt_out",
            Command::Unrecognized => "unrecognized",
        }
    }
}

fn parse_rsvp(body: &str) -> Command {
    let tokens: Vec<&str> = body.split_whitespace().collect();
    let Some(answer) = tokens.get(1) else {
        return Command::RsvpMalformed;
    };

    // The answer token is compared on its first three characters, so "no"
    // must be the whole token while "yes" may run on ("yesss").
    match leading(answer, 3) {
        "yes" => {
            let Some(count) = tokens.get(2).and_then(|t| parse_count(t)) else {
                return Command::RsvpMalformed;
            };
            let note = tokens.get(3..).unwrap_or_default().join(" ");
            Command::Rsvp(RsvpCommand::Accept { count, note })
        }
        "no" => Command::Rsvp(RsvpCommand::Decline {
            note: body.to_string(),
        }),
        _ => Command::RsvpMalformed,
    }
}

/// A non-negative integer token. Counts too large for `u32` saturate, so they
/// still reach the capacity check instead of reading as malformed.
fn parse_count(token: &str) -> Option<u32> {
    let digits = token.strip_prefix('+').unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse().unwrap_or(u32::MAX))
}

/// The first `n` characters of `text`, or all of it when shorter.
fn leading(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accept(count: u32, note: &str) -> Command {
        Command::Rsvp(RsvpCommand::Accept {
            count,
            note: note.to_string(),
        })
    }

    #[test]
    fn save_the_date_answers() {
        assert_eq!(Command::parse("Yes"), Command::SaveTheDate { confirmed: true });
        assert_eq!(Command::parse("YES!!! can't wait"), Command::SaveTheDate { confirmed: true });
        assert_eq!(Command::parse("No"), Command::SaveTheDate { confirmed: false });
        assert_eq!(Command::parse("nope, sorry"), Command::SaveTheDate { confirmed: false });
        assert_eq!(Command::parse("  no  "), Command::SaveTheDate { confirmed: false });
    }

    #[test]
    fn rsvp_yes_with_count_and_note() {
        assert_eq!(Command::parse("RSVP Yes 2"), accept(2, ""));
        assert_eq!(
            Command::parse("rsvp yes 1 So happy   for you"),
            accept(1, "so happy for you")
        );
        assert_eq!(Command::parse("rsvp yesss 3"), accept(3, ""));
    }

    #[test]
    fn oversized_counts_saturate() {
        assert_eq!(Command::parse("rsvp yes 99999999999"), accept(u32::MAX, ""));
        assert_eq!(Command::parse("rsvp yes 4294967296 all of us"), accept(u32::MAX, "all of us"));
        assert_eq!(Command::parse("rsvp yes +2"), accept(2, ""));
        assert_eq!(Command::parse("rsvp yes +"), Command::RsvpMalformed);
        assert_eq!(Command::parse("rsvp yes 2x"), Command::RsvpMalformed);
    }

    #[test]
    fn rsvp_no_keeps_whole_body_as_note() {
        assert_eq!(
            Command::parse("RSVP No sorry we can't make it"),
            Command::Rsvp(RsvpCommand::Decline {
                note: "rsvp no sorry we can't make it".to_string()
            })
        );
    }

    #[test]
    fn rsvp_grammar_violations_are_malformed() {
        assert_eq!(Command::parse("rsvp"), Command::RsvpMalformed);
        assert_eq!(Command::parse("rsvp maybe"), Command::RsvpMalformed);
        assert_eq!(Command::parse("rsvp yes"), Command::RsvpMalformed);
        assert_eq!(Command::parse("rsvp yes two"), Command::RsvpMalformed);
        assert_eq!(Command::parse("rsvp yes -1"), Command::RsvpMalformed);
        // only an exact "no" token declines
        assert_eq!(Command::parse("rsvp nope"), Command::RsvpMalformed);
        assert_eq!(Command::parse("rsvpyes 2"), Command::RsvpMalformed);
    }

    #[test]
    fn stop_carries_body() {
        assert_eq!(
            Command::parse("STOP texting me"),
            Command::OptOut {
                body: "stop texting me".to_string()
            }
        );
    }

    #[test]
    fn unrecognized_bodies() {
        assert_eq!(Command::parse(""), Command::Unrecognized);
        assert_eq!(Command::parse("   "), Command::Unrecognized);
        assert_eq!(Command::parse("hello there"), Command::Unrecognized);
        assert_eq!(Command::parse("i said yes"), Command::Unrecognized);
        assert_eq!(Command::parse("please rsvp yes 2"), Command::Unrecognized);
    }

    #[test]
    fn leading_respects_char_boundaries() {
        assert_eq!(leading("ñoño", 2), "ño");
        assert_eq!(leading("ye", 3), "ye");
    }
}
