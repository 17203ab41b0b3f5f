//! MySQL-backed guest store on the Rocket-managed Diesel pool.

use super::{GuestStore, Result, SharedStore, StoreError};
use crate::guest::{generate_id, Guest, NewGuest};
use crate::models::GuestRow;
use crate::schema::guests::dsl::*;
use async_trait::async_trait;
use chrono::Utc;
use diesel::dsl::exists;
use rocket::fairing::{self, AdHoc};
use rocket::{Build, Rocket};
use rocket_db_pools::diesel::prelude::*;
use rocket_db_pools::diesel::{AsyncMysqlConnection, MysqlPool, RunQueryDsl};
use rocket_db_pools::Database;
use std::sync::Arc;

#[derive(Database)]
#[database("rsvp")]
pub struct Db(MysqlPool);

pub struct MysqlStore {
    pool: MysqlPool,
}

impl MysqlStore {
    pub fn new(pool: MysqlPool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> Result<impl std::ops::DerefMut<Target = AsyncMysqlConnection>> {
        self.pool.get().await.map_err(|e| {
            let msg = format!("Unable to receive connection from connection pool: {e}");
            log::error!("{}", &msg);
            StoreError::Pool(msg)
        })
    }
}

/// Manages a [`MysqlStore`] built from the pool that [`Db`] opened.
///
/// Attach after `Db::init()`.
pub fn fairing() -> AdHoc {
    AdHoc::try_on_ignite("MySQL guest store", |rocket| async move { manage(rocket) })
}

fn manage(rocket: Rocket<Build>) -> fairing::Result {
    match Db::fetch(&rocket).map(|db| db.0.clone()) {
        Some(pool) => {
            let store: SharedStore = Arc::new(MysqlStore::new(pool));
            Ok(rocket.manage(store))
        }
        None => {
            log::error!("database pool `rsvp` is not initialized");
            Err(rocket)
        }
    }
}

#[async_trait]
impl GuestStore for MysqlStore {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Guest>> {
        let mut conn = self.conn().await?;
        let row = guests
            .filter(phone_number.eq(phone))
            .order(seq.asc())
            .select(GuestRow::as_select())
            .first(&mut *conn)
            .await
            .optional()?;
        Ok(row.map(Guest::from))
    }

    async fn get(&self, guest_id: &str) -> Result<Option<Guest>> {
        let mut conn = self.conn().await?;
        let row = guests
            .find(guest_id)
            .select(GuestRow::as_select())
            .first(&mut *conn)
            .await
            .optional()?;
        Ok(row.map(Guest::from))
    }

    async fn all(&self) -> Result<Vec<Guest>> {
        let mut conn = self.conn().await?;
        let rows: Vec<GuestRow> = guests
            .order(seq.asc())
            .select(GuestRow::as_select())
            .load(&mut *conn)
            .await?;
        Ok(rows.into_iter().map(Guest::from).collect())
    }

    async fn insert(&self, new: NewGuest) -> Result<Guest> {
        let mut conn = self.conn().await?;
        let guest_id = loop {
            let candidate = generate_id();
            let taken: bool = diesel::select(exists(guests.filter(id.eq(&candidate))))
                .get_result(&mut *conn)
                .await?;
            if !taken {
                break candidate;
            }
        };

        let guest = Guest::create(guest_id, new, Utc::now().naive_utc());
        diesel::insert_into(guests)
            .values(GuestRow::from(&guest))
            .execute(&mut *conn)
            .await?;
        Ok(guest)
    }

    async fn save(&self, guest: &Guest) -> Result<()> {
        let mut conn = self.conn().await?;
        let mut row = GuestRow::from(guest);
        row.date_modified = Utc::now().naive_utc();
        let updated = diesel::update(guests.find(&guest.id))
            .set(&row)
            .execute(&mut *conn)
            .await?;
        if updated > 0 {
            return Ok(());
        }

        // MySQL reports changed rows, not matched ones; an identical write is 0 too.
        let present: bool = diesel::select(exists(guests.find(&guest.id)))
            .get_result(&mut *conn)
            .await?;
        if present {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    async fn delete(&self, guest_id: &str) -> Result<bool> {
        let mut conn = self.conn().await?;
        let removed = diesel::delete(guests.find(guest_id))
            .execute(&mut *conn)
            .await?;
        Ok(removed > 0)
    }
}
