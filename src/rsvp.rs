//! Applies parsed commands to a guest record.

use crate::command::{Command, RsvpCommand};
use crate::guest::{Guest, TriState};

pub const UNKNOWN_SENDER_REPLY: &str = "I don't recognize your number or something is very broken. \
     Please reach out to Andrew or Sarah directly for help";
pub const SAVE_THE_DATE_CONFIRM_REPLY: &str =
    "Thanks for confirming, we'll be in touch with more info soon!";
pub const SAVE_THE_DATE_DECLINE_REPLY: &str =
    "We understand life can be busy. We'll still be thinking of you on our special day";
pub const RSVP_ACCEPT_REPLY: &str = "We're so glad you're joining us on our special day! \
     Remember to keep up with the wedding site for any updates!";
pub const RSVP_DECLINE_REPLY: &str = "Thank you for responding. We understand life can be busy. \
     We'll be thinking of you on our special day.";
pub const RSVP_HELP_REPLY: &str = "Sorry, but I couldn't understand that. \
     To RSVP, use RSVP Yes/No #of attendees. Examples: RSVP yes 2 or RSVP no.";
pub const OPT_OUT_REPLY: &str = "We're so sorry! We won't text you again about our wedding plans.";

pub fn capacity_reply(allowed: u32) -> String {
    format!(
        "I'm sorry, but we have to keep our wedding small. We ask that you only bring up to \
         {allowed} people. If you need extra, please reach out to Andrew and Sarah and we can work \
         with you"
    )
}

/// Result of applying one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub guest: Guest,
    /// `None` when the message was not understood at all.
    pub reply: Option<String>,
    /// Whether `guest` differs from the input and has to be written back.
    pub changed: bool,
}

impl Transition {
    fn unchanged(guest: &Guest, reply: Option<String>) -> Self {
        Transition {
            guest: guest.clone(),
            reply,
            changed: false,
        }
    }

    fn changed(guest: Guest, reply: impl Into<String>) -> Self {
        Transition {
            guest,
            reply: Some(reply.into()),
            changed: true,
        }
    }
}

/// Computes the new guest state and reply for `command`.
///
/// Every branch either leaves the guest untouched or returns the complete
/// set of changes for that branch, so callers persist it in a single write.
pub fn apply(guest: &Guest, command: &Command) -> Transition {
    match command {
        Command::SaveTheDate { confirmed } => {
            let mut next = guest.clone();
            next.date_saved = TriState::from(*confirmed);
            let reply = if *confirmed {
                SAVE_THE_DATE_CONFIRM_REPLY
            } else {
                SAVE_THE_DATE_DECLINE_REPLY
            };
            Transition::changed(next, reply)
        }
        Command::Rsvp(RsvpCommand::Accept { count, note }) => {
            if *count > guest.total_attendees {
                log::warn!(
                    "guest {} asked for {} seats, only {} allotted",
                    guest.id,
                    count,
                    guest.total_attendees
                );
                return Transition::unchanged(guest, Some(capacity_reply(guest.total_attendees)));
            }
            let mut next = guest.clone();
            next.rsvp = TriState::True;
            next.total_attendees = *count;
            next.append_note(note);
            Transition::changed(next, RSVP_ACCEPT_REPLY)
        }
        Command::Rsvp(RsvpCommand::Decline { note }) => {
            let mut next = guest.clone();
            next.rsvp = TriState::False;
            next.total_attendees = 0;
            next.append_note(note);
            Transition::changed(next, RSVP_DECLINE_REPLY)
        }
        Command::RsvpMalformed => Transition::unchanged(guest, Some(RSVP_HELP_REPLY.to_string())),
        Command::OptOut { body } => {
            let mut next = guest.clone();
            next.stop_notifications = true;
            next.rsvp_notes = Some(body.clone());
            Transition::changed(next, OPT_OUT_REPLY)
        }
        Command::Unrecognized => Transition::unchanged(guest, None),
    }
}
