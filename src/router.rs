//! Routes an inbound text message to the sender's guest record.

use crate::command::Command;
use crate::rsvp::{self, UNKNOWN_SENDER_REPLY};
use crate::store::{self, SharedStore};

/// Country code prefix stripped from sender numbers before lookup.
const COUNTRY_PREFIX: &str = "+1";

pub fn normalize_phone(from: &str) -> &str {
    let from = from.trim();
    from.strip_prefix(COUNTRY_PREFIX).unwrap_or(from)
}

pub struct InboundRouter {
    store: SharedStore,
}

impl InboundRouter {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Handles one message and returns the reply to send, if any.
    ///
    /// A changed guest is written back before the reply is returned; a store
    /// failure aborts the request.
    pub async fn handle(&self, from: &str, body: &str) -> store::Result<Option<String>> {
        let phone = normalize_phone(from);
        let body = body.trim().to_lowercase();

        let Some(guest) = self.store.find_by_phone(phone).await? else {
            log::debug!("Invalid response number {} - body {}", phone, body);
            return Ok(Some(UNKNOWN_SENDER_REPLY.to_string()));
        };

        let command = Command::parse(&body);
        log::debug!("guest {} sent {}", guest.id, command.kind());

        let transition = rsvp::apply(&guest, &command);
        if transition.changed {
            self.store.save(&transition.guest).await?;
            log::info!("updated guest {} ({})", guest.id, command.kind());
        }
        Ok(transition.reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guest::{Guest, NewGuest, TriState};
    use crate::rsvp::{OPT_OUT_REPLY, RSVP_ACCEPT_REPLY, RSVP_HELP_REPLY};
    use crate::store::{GuestStore, MemoryStore, StoreError};
    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::sync::Arc;

    enum Fault {
        Lookup,
        Save,
        /// The guest is deleted right after it is looked up.
        Vanish,
    }

    /// Wraps a [`MemoryStore`] and fails one operation.
    struct FaultyStore {
        inner: MemoryStore,
        fault: Fault,
    }

    #[async_trait]
    impl GuestStore for FaultyStore {
        async fn find_by_phone(&self, phone_number: &str) -> store::Result<Option<Guest>> {
            match self.fault {
                Fault::Lookup => Err(StoreError::Database("connection reset".into())),
                Fault::Vanish => {
                    let found = self.inner.find_by_phone(phone_number).await?;
                    if let Some(guest) = &found {
                        self.inner.delete(&guest.id).await?;
                    }
                    Ok(found)
                }
                Fault::Save => self.inner.find_by_phone(phone_number).await,
            }
        }

        async fn get(&self, id: &str) -> store::Result<Option<Guest>> {
            self.inner.get(id).await
        }

        async fn all(&self) -> store::Result<Vec<Guest>> {
            self.inner.all().await
        }

        async fn insert(&self, new: NewGuest) -> store::Result<Guest> {
            self.inner.insert(new).await
        }

        async fn save(&self, guest: &Guest) -> store::Result<()> {
            match self.fault {
                Fault::Save => Err(StoreError::Database("lock wait timeout".into())),
                _ => self.inner.save(guest).await,
            }
        }

        async fn delete(&self, id: &str) -> store::Result<bool> {
            self.inner.delete(id).await
        }
    }

    async fn faulty(fault: Fault) -> (Arc<FaultyStore>, InboundRouter) {
        let store = Arc::new(FaultyStore {
            inner: MemoryStore::new(),
            fault,
        });
        store.inner.insert(john_and_jane()).await.unwrap();
        let router = InboundRouter::new(store.clone());
        (store, router)
    }

    fn john_and_jane() -> NewGuest {
        NewGuest {
            name: "John and Jane Doe".into(),
            total_attendees: 2,
            phone_number: "5555555555".into(),
            email_address: String::new(),
            physical_address: String::new(),
        }
    }

    async fn seeded() -> (Arc<MemoryStore>, InboundRouter) {
        let store = Arc::new(MemoryStore::new());
        store.insert(john_and_jane()).await.unwrap();
        let router = InboundRouter::new(store.clone());
        (store, router)
    }

    #[test]
    fn strips_only_literal_country_prefix() {
        assert_eq!(normalize_phone("+15555555555"), "5555555555");
        assert_eq!(normalize_phone("5555555555"), "5555555555");
        assert_eq!(normalize_phone("15555555551"), "15555555551");
        assert_eq!(normalize_phone("+445555555555"), "+445555555555");
    }

    #[rocket::async_test]
    async fn unknown_sender_gets_fallback() {
        let (store, router) = seeded().await;
        let before = store.all().await.unwrap();
        let reply = router.handle("+11234567890", "No").await.unwrap();
        assert_eq!(reply.as_deref(), Some(UNKNOWN_SENDER_REPLY));
        assert_eq!(store.all().await.unwrap(), before);
    }

    #[rocket::async_test]
    async fn rsvp_is_persisted() {
        let (store, router) = seeded().await;
        let reply = router.handle("+15555555555", "RSVP Yes 1 So happy").await.unwrap();
        assert_eq!(reply.as_deref(), Some(RSVP_ACCEPT_REPLY));

        let guest = store.find_by_phone("5555555555").await.unwrap().unwrap();
        assert_eq!(guest.rsvp, TriState::True);
        assert_eq!(guest.total_attendees, 1);
        assert_eq!(guest.rsvp_notes.as_deref(), Some("so happy"));
    }

    #[rocket::async_test]
    async fn malformed_rsvp_leaves_guest_alone() {
        let (store, router) = seeded().await;
        let before = store.all().await.unwrap();
        let reply = router.handle("5555555555", "rsvp maybe").await.unwrap();
        assert_eq!(reply.as_deref(), Some(RSVP_HELP_REPLY));
        assert_eq!(store.all().await.unwrap(), before);
    }

    #[rocket::async_test]
    async fn opted_out_guests_are_still_answered() {
        let (store, router) = seeded().await;
        let reply = router.handle("5555555555", "Stop").await.unwrap();
        assert_eq!(reply.as_deref(), Some(OPT_OUT_REPLY));
        let reply = router.handle("5555555555", "yes").await.unwrap();
        assert!(reply.is_some());

        let guest = store.find_by_phone("5555555555").await.unwrap().unwrap();
        assert!(guest.stop_notifications);
        assert_eq!(guest.date_saved, TriState::True);
    }

    #[rocket::async_test]
    async fn unrecognized_body_has_no_reply() {
        let (_, router) = seeded().await;
        assert_eq!(router.handle("5555555555", "who is this?").await.unwrap(), None);
    }

    #[rocket::async_test]
    async fn failed_lookup_aborts_without_reply() {
        let (_, router) = faulty(Fault::Lookup).await;
        let result = router.handle("+15555555555", "RSVP Yes 2").await;
        assert!(matches!(result, Err(StoreError::Database(_))), "{result:?}");
    }

    #[rocket::async_test]
    async fn failed_save_aborts_without_reply() {
        let (store, router) = faulty(Fault::Save).await;
        let result = router.handle("+15555555555", "RSVP Yes 1").await;
        assert!(matches!(result, Err(StoreError::Database(_))), "{result:?}");

        let guest = store.inner.find_by_phone("5555555555").await.unwrap().unwrap();
        assert_eq!(guest.rsvp, TriState::Unset);
        assert_eq!(guest.total_attendees, 2);
    }

    #[rocket::async_test]
    async fn guest_deleted_mid_request_gets_no_confirmation() {
        let (store, router) = faulty(Fault::Vanish).await;
        let result = router.handle("+15555555555", "RSVP Yes 1").await;
        assert!(matches!(result, Err(StoreError::NotFound)), "{result:?}");
        assert!(store.inner.all().await.unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn unknown_number_never_mutates(from in "\\+1[0-4][0-9]{9}", body in "[a-zA-Z0-9 ]{0,30}") {
            let runtime = rocket::tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async {
                let (store, router) = seeded().await;
                let before = store.all().await.unwrap();
                let reply = router.handle(&from, &body).await.unwrap();
                assert_eq!(reply.as_deref(), Some(UNKNOWN_SENDER_REPLY));
                assert_eq!(store.all().await.unwrap(), before);
            });
        }
    }
}
