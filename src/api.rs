//! HTTP endpoints, mounted under `/api`.

use crate::error::ApiError;
use crate::filter::{parse_tri_state, str2bool, Audience, GuestFilter};
use crate::guest::{Guest, GuestUpdate, NewGuest};
use crate::router::{normalize_phone, InboundRouter};
use crate::store::SharedStore;
use crate::twilio::{twiml, InboundSms};
use rocket::form::Form;
use rocket::http::Status;
use rocket::response::content::RawXml;
use rocket::response::status::Created;
use rocket::serde::json::{self, Json};
use rocket::{Route, State};

const NOT_AN_INTEGER: &str = "Total Attendees must be an integer number";

pub fn routes() -> Vec<Route> {
    routes![
        sms,
        list_guests,
        broadcast,
        get_guest,
        create_guest_json,
        create_guest_form,
        update_guest_json,
        update_guest_form,
        delete_guest,
    ]
}

/// Form-encoded guest fields. Everything arrives as text and is coerced here.
#[derive(Debug, Default, FromForm)]
pub struct GuestForm {
    name: Option<String>,
    total_attendees: Option<String>,
    phone_number: Option<String>,
    email_address: Option<String>,
    physical_address: Option<String>,
    date_saved: Option<String>,
    rsvp: Option<String>,
    rsvp_notes: Option<String>,
    stop_notifications: Option<String>,
}

fn parse_total(total: Option<String>) -> Result<Option<u32>, ApiError> {
    total
        .map(|t| t.trim().parse::<u32>())
        .transpose()
        .map_err(|_| ApiError::BadRequest(NOT_AN_INTEGER.to_string()))
}

impl GuestForm {
    fn into_new_guest(self) -> Result<NewGuest, ApiError> {
        let total_attendees = parse_total(self.total_attendees)?;
        Ok(NewGuest {
            name: self.name.unwrap_or_default(),
            total_attendees: total_attendees.unwrap_or(1),
            phone_number: self.phone_number.unwrap_or_default(),
            email_address: self.email_address.unwrap_or_default(),
            physical_address: self.physical_address.unwrap_or_default(),
        })
    }

    fn into_update(self) -> Result<GuestUpdate, ApiError> {
        Ok(GuestUpdate {
            name: self.name,
            total_attendees: parse_total(self.total_attendees)?,
            phone_number: self.phone_number,
            email_address: self.email_address,
            physical_address: self.physical_address,
            date_saved: self.date_saved.as_deref().map(parse_tri_state),
            rsvp: self.rsvp.as_deref().map(parse_tri_state),
            rsvp_notes: self.rsvp_notes.map(Some),
            stop_notifications: self.stop_notifications.as_deref().map(str2bool),
        })
    }
}

fn json_error(e: json::Error<'_>) -> ApiError {
    match e {
        json::Error::Io(e) => ApiError::BadRequest(e.to_string()),
        json::Error::Parse(_, e) => ApiError::BadRequest(e.to_string()),
    }
}

/// Rejects a phone number already used by a different guest.
async fn ensure_phone_available(
    store: &SharedStore,
    phone_number: &str,
    owner: Option<&str>,
) -> Result<(), ApiError> {
    match store.find_by_phone(phone_number).await? {
        Some(existing) if Some(existing.id.as_str()) != owner => Err(ApiError::Conflict(format!(
            "Phone number {phone_number} already belongs to guest {}",
            existing.id
        ))),
        _ => Ok(()),
    }
}

async fn create(store: &SharedStore, mut new: NewGuest) -> Result<Created<Json<Guest>>, ApiError> {
    new.phone_number = normalize_phone(&new.phone_number).to_string();
    new.validate().map_err(ApiError::BadRequest)?;
    ensure_phone_available(store, &new.phone_number, None).await?;
    let guest = store.insert(new).await?;
    log::info!("created guest {}", guest.id);
    Ok(Created::new(format!("/api/guest/{}", guest.id)).body(Json(guest)))
}

async fn update(store: &SharedStore, id: &str, mut update: GuestUpdate) -> Result<Json<Guest>, ApiError> {
    let mut guest = store.get(id).await?.ok_or(ApiError::NotFound)?;
    if let Some(phone_number) = update.phone_number.as_mut() {
        *phone_number = normalize_phone(phone_number).to_string();
        ensure_phone_available(store, phone_number, Some(id)).await?;
    }
    update.apply_to(&mut guest);
    store.save(&guest).await?;
    log::info!("edited guest {}", id);

    let saved = store.get(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(saved))
}

#[post("/sms", data = "<sms>")]
async fn sms(sms: InboundSms, store: &State<SharedStore>) -> Result<RawXml<String>, ApiError> {
    let router = InboundRouter::new(store.inner().clone());
    let reply = router.handle(&sms.from, &sms.body).await?;
    Ok(twiml(reply.as_deref()))
}

#[get("/guests?<guest_filter>&<guest_filter_value>")]
async fn list_guests(
    guest_filter: Option<&str>,
    guest_filter_value: Option<&str>,
    store: &State<SharedStore>,
) -> Result<Json<Vec<Guest>>, ApiError> {
    let filter = GuestFilter::from_params(guest_filter, guest_filter_value);
    let guests = store.all().await?;
    Ok(Json(filter.select(&guests).into_iter().cloned().collect()))
}

#[get("/broadcast/<audience>")]
async fn broadcast(audience: &str, store: &State<SharedStore>) -> Result<Json<Vec<Guest>>, ApiError> {
    let audience: Audience = audience.parse().map_err(|_| ApiError::NotFound)?;
    let guests = store.all().await?;
    Ok(Json(audience.select(&guests).into_iter().cloned().collect()))
}

#[get("/guest/<id>")]
async fn get_guest(id: &str, store: &State<SharedStore>) -> Result<Json<Guest>, ApiError> {
    let guest = store.get(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(guest))
}

#[post("/guest", format = "json", data = "<guest>")]
async fn create_guest_json(
    guest: Result<Json<NewGuest>, json::Error<'_>>,
    store: &State<SharedStore>,
) -> Result<Created<Json<Guest>>, ApiError> {
    let guest = guest.map_err(json_error)?.into_inner();
    create(store, guest).await
}

#[post("/guest", format = "form", data = "<guest>", rank = 2)]
async fn create_guest_form(
    guest: Form<GuestForm>,
    store: &State<SharedStore>,
) -> Result<Created<Json<Guest>>, ApiError> {
    let guest = guest.into_inner().into_new_guest()?;
    create(store, guest).await
}

#[put("/guest/<id>", format = "json", data = "<changes>")]
async fn update_guest_json(
    id: &str,
    changes: Result<Json<GuestUpdate>, json::Error<'_>>,
    store: &State<SharedStore>,
) -> Result<Json<Guest>, ApiError> {
    let changes = changes.map_err(json_error)?.into_inner();
    update(store, id, changes).await
}

#[put("/guest/<id>", format = "form", data = "<changes>", rank = 2)]
async fn update_guest_form(
    id: &str,
    changes: Form<GuestForm>,
    store: &State<SharedStore>,
) -> Result<Json<Guest>, ApiError> {
    let changes = changes.into_inner().into_update()?;
    update(store, id, changes).await
}

#[delete("/guest/<id>")]
async fn delete_guest(id: &str, store: &State<SharedStore>) -> Result<Status, ApiError> {
    if store.delete(id).await? {
        log::info!("deleted guest {}", id);
        Ok(Status::Ok)
    } else {
        Err(ApiError::NotFound)
    }
}
