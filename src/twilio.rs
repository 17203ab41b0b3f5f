//! Messaging provider boundary: webhook signature checks and TwiML replies.
//!
//! A webhook is signed with `base64(HMAC-SHA1(auth_token, url ++ params))`,
//! where `params` is every form field concatenated as `name ++ value` in
//! name order.

use crate::settings::Settings;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ring::hmac;
use rocket::data::{self, Data, FromData, Limits};
use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::response::content::RawXml;
use rocket::Request;
use url::form_urlencoded;

pub const SIGNATURE_HEADER: &str = "X-Twilio-Signature";

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("request body is too large")]
    TooLarge,
    #[error("unable to read request body: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing form field `{0}`")]
    MissingField(&'static str),
    #[error("request signature does not verify")]
    BadSignature,
    #[error("application settings are not available")]
    Unconfigured,
}

/// An inbound SMS webhook that passed signature validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundSms {
    pub from: String,
    pub body: String,
}

/// Signs `url` and `params` the way the provider does.
pub fn sign(auth_token: &str, url: &str, params: &[(String, String)]) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, auth_token.as_bytes());
    STANDARD.encode(hmac::sign(&key, &signed_payload(url, params)).as_ref())
}

/// Checks `signature` against `url` and `params` in constant time.
pub fn verify(auth_token: &str, url: &str, params: &[(String, String)], signature: &str) -> bool {
    let Ok(tag) = STANDARD.decode(signature) else {
        return false;
    };
    let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, auth_token.as_bytes());
    hmac::verify(&key, &signed_payload(url, params), &tag).is_ok()
}

fn signed_payload(url: &str, params: &[(String, String)]) -> Vec<u8> {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort();

    let mut payload = url.as_bytes().to_vec();
    for (name, value) in sorted {
        payload.extend_from_slice(name.as_bytes());
        payload.extend_from_slice(value.as_bytes());
    }
    payload
}

/// The URL the provider signed: the configured public base, or the `Host` header.
fn request_url(req: &Request<'_>, settings: &Settings) -> String {
    let base = match (&settings.public_url, req.host()) {
        (Some(public), _) => public.trim_end_matches('/').to_string(),
        (None, Some(host)) => format!("https://{host}"),
        (None, None) => String::new(),
    };
    format!("{base}{}", req.uri())
}

fn field(params: &[(String, String)], name: &'static str) -> Result<String, WebhookError> {
    params
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.clone())
        .ok_or(WebhookError::MissingField(name))
}

#[rocket::async_trait]
impl<'r> FromData<'r> for InboundSms {
    type Error = WebhookError;

    async fn from_data(req: &'r Request<'_>, data: Data<'r>) -> data::Outcome<'r, Self> {
        let Some(settings) = req.rocket().state::<Settings>() else {
            return Outcome::Error((Status::InternalServerError, WebhookError::Unconfigured));
        };

        let limit = req.limits().get("form").unwrap_or(Limits::FORM);
        let body = match data.open(limit).into_string().await {
            Ok(body) if body.is_complete() => body.into_inner(),
            Ok(_) => return Outcome::Error((Status::PayloadTooLarge, WebhookError::TooLarge)),
            Err(e) => return Outcome::Error((Status::BadRequest, WebhookError::Io(e))),
        };
        let params: Vec<(String, String)> = form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect();

        if settings.validate_signatures {
            let token = settings.twilio_auth_token.as_deref().unwrap_or_default();
            let url = request_url(req, settings);
            let signature = req.headers().get_one(SIGNATURE_HEADER).unwrap_or_default();
            if !verify(token, &url, &params, signature) {
                log::warn!("rejected webhook with bad signature for {}", url);
                return Outcome::Error((Status::Forbidden, WebhookError::BadSignature));
            }
        }

        let sms = field(&params, "From").and_then(|from| {
            field(&params, "Body").map(|body| InboundSms { from, body })
        });
        match sms {
            Ok(sms) => Outcome::Success(sms),
            Err(e) => Outcome::Error((Status::BadRequest, e)),
        }
    }
}

/// Wraps a reply in a TwiML envelope. No reply yields an empty `<Response/>`.
pub fn twiml(reply: Option<&str>) -> RawXml<String> {
    let inner = match reply {
        Some(text) => format!("<Message>{}</Message>", html_escape::encode_text(text)),
        None => String::new(),
    };
    RawXml(format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><Response>{inner}</Response>"#
    ))
}
