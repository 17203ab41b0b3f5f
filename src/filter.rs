//! Guest list queries used by the list endpoint and the broadcast tooling.

use crate::guest::{Guest, TriState};
use std::collections::HashSet;
use std::str::FromStr;

/// A single-predicate view of the guest list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuestFilter {
    /// Everyone who has not opted out of texts.
    AllContacts,
    SaveTheDate(TriState),
    Rsvp(TriState),
    Everyone,
}

impl GuestFilter {
    /// Interprets the `guest_filter` / `guest_filter_value` query parameters.
    ///
    /// Anything missing or unknown falls back to the whole list.
    pub fn from_params(kind: Option<&str>, value: Option<&str>) -> GuestFilter {
        let Some(kind) = kind.map(str::to_lowercase) else {
            return GuestFilter::Everyone;
        };
        if kind == "all_contacts" {
            return GuestFilter::AllContacts;
        }
        let Some(value) = value.map(parse_tri_state) else {
            return GuestFilter::Everyone;
        };
        match kind.as_str() {
            "std" | "savethedate" => GuestFilter::SaveTheDate(value),
            "rsvp" => GuestFilter::Rsvp(value),
            _ => GuestFilter::Everyone,
        }
    }

    pub fn matches(&self, guest: &Guest) -> bool {
        match self {
            GuestFilter::AllContacts => !guest.stop_notifications,
            GuestFilter::SaveTheDate(value) => guest.date_saved == *value,
            GuestFilter::Rsvp(value) => guest.rsvp == *value,
            GuestFilter::Everyone => true,
        }
    }

    /// Keeps the matching guests, preserving order.
    pub fn select<'a>(&self, guests: &'a [Guest]) -> Vec<&'a Guest> {
        guests.iter().filter(|g| self.matches(g)).collect()
    }
}

/// Lenient boolean coercion: `yes`, `true`, `t` and `1` are true, anything else false.
pub fn str2bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "yes" | "true" | "t" | "1")
}

/// Like [`str2bool`], except `none` and `null` mean the answer is unset.
pub fn parse_tri_state(value: &str) -> TriState {
    match value.to_lowercase().as_str() {
        "none" | "null" => TriState::Unset,
        other => str2bool(other).into(),
    }
}

/// Guests still owed a save-the-date reminder: everyone who has not declined.
///
/// Unanswered guests come first, then confirmed ones.
pub fn needs_save_the_date_reminder(guests: &[Guest]) -> Vec<&Guest> {
    let mut audience = GuestFilter::SaveTheDate(TriState::Unset).select(guests);
    audience.extend(GuestFilter::SaveTheDate(TriState::True).select(guests));
    audience
}

/// Guests who have not RSVP'd, minus those who declined the save-the-date.
pub fn not_yet_rsvped(guests: &[Guest]) -> Vec<&Guest> {
    let declined: HashSet<&str> = GuestFilter::SaveTheDate(TriState::False)
        .select(guests)
        .into_iter()
        .map(|g| g.id.as_str())
        .collect();

    GuestFilter::Rsvp(TriState::Unset)
        .select(guests)
        .into_iter()
        .filter(|g| !declined.contains(g.id.as_str()))
        .collect()
}

/// Recipient lists for outbound broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    SaveTheDate,
    Rsvp,
    RsvpChase,
    Update,
}

impl Audience {
    pub fn select<'a>(&self, guests: &'a [Guest]) -> Vec<&'a Guest> {
        match self {
            Audience::SaveTheDate | Audience::Update => GuestFilter::AllContacts.select(guests),
            Audience::Rsvp => needs_save_the_date_reminder(guests),
            Audience::RsvpChase => not_yet_rsvped(guests),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown audience `{0}`")]
pub struct UnknownAudience(String);

impl FromStr for Audience {
    type Err = UnknownAudience;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "save_the_date" => Ok(Audience::SaveTheDate),
            "rsvp" => Ok(Audience::Rsvp),
            "rsvp_chase" => Ok(Audience::RsvpChase),
            "update" => Ok(Audience::Update),
            other => Err(UnknownAudience(other.to_string())),
        }
    }
}
