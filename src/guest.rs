//! Guest records and the tri-state answers they carry.

use chrono::NaiveDateTime;
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Deserializer, Serialize};

/// Length of a generated guest id.
pub const GUEST_ID_LEN: usize = 12;

/// An answer that may not have been given yet.
///
/// Serialized as `null` / `true` / `false`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum TriState {
    #[default]
    Unset,
    True,
    False,
}

impl TriState {
    pub fn is_unset(self) -> bool {
        self == TriState::Unset
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => TriState::Unset,
            Some(true) => TriState::True,
            Some(false) => TriState::False,
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        Some(value).into()
    }
}

impl From<TriState> for Option<bool> {
    fn from(value: TriState) -> Self {
        match value {
            TriState::Unset => None,
            TriState::True => Some(true),
            TriState::False => Some(false),
        }
    }
}

/// One invited party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    pub id: String,
    pub name: String,
    /// Seats allotted. An SMS RSVP may lower this but never raise it.
    pub total_attendees: u32,
    pub phone_number: String,
    pub email_address: String,
    pub physical_address: String,
    pub date_saved: TriState,
    pub rsvp: TriState,
    pub rsvp_notes: Option<String>,
    pub stop_notifications: bool,
    pub last_notified: Option<NaiveDateTime>,
    pub date_created: NaiveDateTime,
    pub date_modified: NaiveDateTime,
}

impl Guest {
    /// Builds a fresh record with every answer unset.
    pub fn create(id: String, new: NewGuest, now: NaiveDateTime) -> Self {
        Guest {
            id,
            name: new.name,
            total_attendees: new.total_attendees,
            phone_number: new.phone_number,
            email_address: new.email_address,
            physical_address: new.physical_address,
            date_saved: TriState::Unset,
            rsvp: TriState::Unset,
            rsvp_notes: None,
            stop_notifications: false,
            last_notified: None,
            date_created: now,
            date_modified: now,
        }
    }

    /// Appends a line to the RSVP log, starting the log if it is empty.
    pub fn append_note(&mut self, note: &str) {
        let note = note.to_lowercase();
        match &mut self.rsvp_notes {
            Some(notes) if !notes.is_empty() => {
                notes.push('\n');
                notes.push_str(&note);
            }
            notes => *notes = Some(note),
        }
    }
}

/// Generates a random upper-case alphanumeric guest id.
pub fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GUEST_ID_LEN)
        .map(char::from)
        .collect::<String>()
        .to_ascii_uppercase()
}

/// Fields accepted when a guest is created.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewGuest {
    pub name: String,
    pub total_attendees: u32,
    pub phone_number: String,
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub physical_address: String,
}

impl NewGuest {
    pub fn validate(&self) -> Result<(), String> {
        if self.total_attendees == 0 {
            return Err("Total Attendees must be at least 1".to_string());
        }
        if self.phone_number.trim().is_empty() {
            return Err("Phone number is required".to_string());
        }
        Ok(())
    }
}

/// A partial administrative edit. Absent fields are left alone.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GuestUpdate {
    pub name: Option<String>,
    pub total_attendees: Option<u32>,
    pub phone_number: Option<String>,
    pub email_address: Option<String>,
    pub physical_address: Option<String>,
    #[serde(deserialize_with = "present")]
    pub date_saved: Option<TriState>,
    #[serde(deserialize_with = "present")]
    pub rsvp: Option<TriState>,
    #[serde(deserialize_with = "present")]
    pub rsvp_notes: Option<Option<String>>,
    pub stop_notifications: Option<bool>,
}

/// Distinguishes an explicit `null` from a missing field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl GuestUpdate {
    pub fn apply_to(self, guest: &mut Guest) {
        if let Some(name) = self.name {
            guest.name = name;
        }
        if let Some(total) = self.total_attendees {
            guest.total_attendees = total;
        }
        if let Some(phone) = self.phone_number {
            guest.phone_number = phone;
        }
        if let Some(email) = self.email_address {
            guest.email_address = email;
        }
        if let Some(address) = self.physical_address {
            guest.physical_address = address;
        }
        if let Some(date_saved) = self.date_saved {
            guest.date_saved = date_saved;
        }
        if let Some(rsvp) = self.rsvp {
            guest.rsvp = rsvp;
        }
        if let Some(notes) = self.rsvp_notes {
            guest.rsvp_notes = notes;
        }
        if let Some(stop) = self.stop_notifications {
            guest.stop_notifications = stop;
        }
    }
}
