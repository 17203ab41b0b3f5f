use super::schema::guests;
use crate::guest::Guest;
use diesel::prelude::*;
use chrono::NaiveDateTime;

/// A row of the `guests` table. Tri-state answers are stored as nullable booleans.
#[derive(Debug, Clone, Insertable, Selectable, Queryable, AsChangeset)]
#[diesel(table_name = guests)]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
#[diesel(treat_none_as_null = true)]
pub struct GuestRow {
    pub id: String,
    pub name: String,
    pub total_attendees: u32,
    pub phone_number: String,
    pub email_address: String,
    pub physical_address: String,
    pub date_saved: Option<bool>,
    pub rsvp: Option<bool>,
    pub rsvp_notes: Option<String>,
    pub stop_notifications: bool,
    pub last_notified: Option<NaiveDateTime>,
    pub date_created: NaiveDateTime,
    pub date_modified: NaiveDateTime,
}

impl From<GuestRow> for Guest {
    fn from(row: GuestRow) -> Self {
        Guest {
            id: row.id,
            name: row.name,
            total_attendees: row.total_attendees,
            phone_number: row.phone_number,
            email_address: row.email_address,
            physical_address: row.physical_address,
            date_saved: row.date_saved.into(),
            rsvp: row.rsvp.into(),
            rsvp_notes: row.rsvp_notes,
            stop_notifications: row.stop_notifications,
            last_notified: row.last_notified,
            date_created: row.date_created,
            date_modified: row.date_modified,
        }
    }
}

impl From<&Guest> for GuestRow {
    fn from(guest: &Guest) -> Self {
        GuestRow {
            id: guest.id.clone(),
            name: guest.name.clone(),
            total_attendees: guest.total_attendees,
            phone_number: guest.phone_number.clone(),
            email_address: guest.email_address.clone(),
            physical_address: guest.physical_address.clone(),
            date_saved: guest.date_saved.into(),
            rsvp: guest.rsvp.into(),
            rsvp_notes: guest.rsvp_notes.clone(),
            stop_notifications: guest.stop_notifications,
            last_notified: guest.last_notified,
            date_created: guest.date_created,
            date_modified: guest.date_modified,
        }
    }
}
