//! Guest list and SMS RSVP reply service.
//!
//! Inbound texts are routed to the sender's guest record ([`router`]),
//! parsed into a [`command::Command`] and applied by [`rsvp::apply`]. The
//! [`filter`] module answers guest list queries for the broadcast tooling.

#[macro_use]
extern crate rocket;

pub mod api;
pub mod command;
pub mod error;
pub mod filter;
pub mod guest;
pub mod models;
pub mod router;
pub mod rsvp;
pub mod schema;
pub mod settings;
pub mod store;
pub mod twilio;

use rocket::{Build, Rocket};
use rocket_db_pools::Database;

/// The production server: routes plus the MySQL-backed guest store.
pub fn rocket() -> Rocket<Build> {
    service(rocket::build())
        .attach(store::mysql::Db::init())
        .attach(store::mysql::fairing())
}

/// Mounts the API and settings on `rocket`.
///
/// A [`store::SharedStore`] has to be managed separately.
pub fn service(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .attach(settings::fairing())
        .mount("/api", api::routes())
}
