use super::{GuestStore, Result, StoreError};
use crate::guest::{generate_id, Guest, NewGuest};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

/// Keeps guests in process memory, in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    guests: Mutex<Vec<Guest>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GuestStore for MemoryStore {
    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<Guest>> {
        let guests = self.guests.lock();
        Ok(guests.iter().find(|g| g.phone_number == phone_number).cloned())
    }

    async fn get(&self, id: &str) -> Result<Option<Guest>> {
        let guests = self.guests.lock();
        Ok(guests.iter().find(|g| g.id == id).cloned())
    }

    async fn all(&self) -> Result<Vec<Guest>> {
        Ok(self.guests.lock().clone())
    }

    async fn insert(&self, new: NewGuest) -> Result<Guest> {
        let mut guests = self.guests.lock();
        let id = loop {
            let id = generate_id();
            if !guests.iter().any(|g| g.id == id) {
                break id;
            }
        };
        let guest = Guest::create(id, new, Utc::now().naive_utc());
        guests.push(guest.clone());
        Ok(guest)
    }

    async fn save(&self, guest: &Guest) -> Result<()> {
        let mut guests = self.guests.lock();
        let stored = guests
            .iter_mut()
            .find(|g| g.id == guest.id)
            .ok_or(StoreError::NotFound)?;
        *stored = Guest {
            date_modified: Utc::now().naive_utc(),
            ..guest.clone()
        };
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut guests = self.guests.lock();
        let before = guests.len();
        guests.retain(|g| g.id != id);
        Ok(guests.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guest::TriState;

    fn new_guest(phone: &str) -> NewGuest {
        NewGuest {
            name: "John and Jane Doe".into(),
            total_attendees: 2,
            phone_number: phone.into(),
            email_address: String::new(),
            physical_address: String::new(),
        }
    }

    #[rocket::async_test]
    async fn insert_then_lookup() {
        let store = MemoryStore::new();
        let created = store.insert(new_guest("5555555555")).await.unwrap();
        assert_eq!(created.total_attendees, 2);
        assert_eq!(created.rsvp, TriState::Unset);
        assert!(!created.stop_notifications);

        let by_phone = store.find_by_phone("5555555555").await.unwrap();
        assert_eq!(by_phone.as_ref(), Some(&created));
        let by_id = store.get(&created.id).await.unwrap();
        assert_eq!(by_id, Some(created));
        assert_eq!(store.find_by_phone("+15555555555").await.unwrap(), None);
    }

    #[rocket::async_test]
    async fn earliest_guest_wins_phone_lookup() {
        let store = MemoryStore::new();
        let first = store.insert(new_guest("5551234567")).await.unwrap();
        store.insert(new_guest("5551234567")).await.unwrap();
        let found = store.find_by_phone("5551234567").await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
    }

    #[rocket::async_test]
    async fn save_overwrites_and_missing_guest_fails() {
        let store = MemoryStore::new();
        let mut guest = store.insert(new_guest("5555555555")).await.unwrap();
        guest.rsvp = TriState::True;
        store.save(&guest).await.unwrap();
        let stored = store.get(&guest.id).await.unwrap().unwrap();
        assert_eq!(stored.rsvp, TriState::True);
        assert!(stored.date_modified >= guest.date_created);

        guest.id = "NOPE".into();
        assert!(matches!(store.save(&guest).await, Err(StoreError::NotFound)));
    }

    #[rocket::async_test]
    async fn delete_reports_removal() {
        let store = MemoryStore::new();
        let guest = store.insert(new_guest("5555555555")).await.unwrap();
        assert!(store.delete(&guest.id).await.unwrap());
        assert!(!store.delete(&guest.id).await.unwrap());
        assert!(store.all().await.unwrap().is_empty());
    }
}
