//! Message DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use geoboard::{Location, Message, Sender, StoredMessage};

use crate::application::{LocationQuery, DEFAULT_LIMIT, DEFAULT_RADIUS_METERS};

/// Coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LocationBody {
    pub long: f64,
    pub lat: f64,
}

impl LocationBody {
    /// Reject coordinates outside the valid ranges
    pub fn validate(&self) -> Result<Location, String> {
        validate_location(self.long, self.lat)
    }
}

impl From<Location> for LocationBody {
    fn from(location: Location) -> Self {
        Self {
            long: location.long,
            lat: location.lat,
        }
    }
}

fn validate_location(long: f64, lat: f64) -> Result<Location, String> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err("lat must be within [-90, 90]".to_string());
    }
    if !(-180.0..=180.0).contains(&long) {
        return Err("long must be within [-180, 180]".to_string());
    }
    Ok(Location::new(long, lat))
}

/// Post message request. The sender comes from the bearer token.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddMessageRequest {
    pub content: String,
    pub location: LocationBody,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
}

impl AddMessageRequest {
    pub fn into_message(self, sender: Sender) -> Result<Message, String> {
        let location = self.location.validate()?;

        Ok(Message {
            sender,
            content: self.content,
            location,
            client_id: self.client_id.unwrap_or_default(),
            sent_at: self.sent_at,
        })
    }
}

/// Query parameters for the location search
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MessagesQuery {
    /// Latitude of the center point
    pub lat: Option<f64>,
    /// Longitude of the center point
    pub long: Option<f64>,
    /// Search radius in meters (default: 100)
    pub radius: Option<f64>,
    /// Maximum number of messages (default: 100)
    pub limit: Option<usize>,
    /// Unix milliseconds; only messages created after this (default: 0)
    pub after: Option<i64>,
}

impl MessagesQuery {
    pub fn into_location_query(self) -> Result<LocationQuery, String> {
        let lat = self.lat.ok_or("lat parameter not provided")?;
        let long = self.long.ok_or("long parameter not provided")?;
        let location = validate_location(long, lat)?;

        let radius_meters = self.radius.unwrap_or(DEFAULT_RADIUS_METERS);
        if !radius_meters.is_finite() || radius_meters < 0.0 {
            return Err("invalid radius parameter".to_string());
        }

        let after = match self.after {
            Some(millis) => {
                DateTime::<Utc>::from_timestamp_millis(millis).ok_or("invalid after parameter")?
            }
            None => DateTime::<Utc>::UNIX_EPOCH,
        };

        Ok(LocationQuery {
            location,
            radius_meters,
            limit: self.limit.unwrap_or(DEFAULT_LIMIT),
            after,
        })
    }
}

/// Message author
#[derive(Debug, Serialize, ToSchema)]
pub struct SenderResponse {
    pub id: String,
    pub username: String,
}

/// Stored message response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_at: Option<DateTime<Utc>>,
    pub sender: SenderResponse,
    pub content: String,
    pub location: LocationBody,
    pub client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
}

impl From<StoredMessage> for MessageResponse {
    fn from(stored: StoredMessage) -> Self {
        let message = stored.message;
        Self {
            id: stored.id,
            created_at: stored.created_at,
            received_at: stored.received_at,
            sender: SenderResponse {
                id: message.sender.id,
                username: message.sender.username,
            },
            content: message.content,
            location: message.location.into(),
            client_id: message.client_id,
            sent_at: message.sent_at,
        }
    }
}
