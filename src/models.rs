use crate::errors::ValidationError;
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Regular,
    Van,
}

impl VehicleType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Van => "van",
        }
    }

    /// Capitalized form used on every page that shows a booking.
    pub fn label(self) -> &'static str {
        match self {
            Self::Regular => "Regular",
            Self::Van => "Van",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "regular" => Ok(Self::Regular),
            "van" => Ok(Self::Van),
            _ => Err(ValidationError::InvalidVehicleType),
        }
    }
}

/// A booking as the backend reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(default)]
    pub id: Option<i64>,
    pub date: String,
    pub time: String,
    pub registration_plate: String,
    pub vehicle_type: VehicleType,
    #[serde(default, alias = "recyclingPlant")]
    pub plant_name: Option<String>,
    pub registration_key: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub checked_in: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub date: String,
    pub time: String,
    pub registration_plate: String,
    pub vehicle_type: VehicleType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recycling_plant: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    #[serde(default)]
    pub registration_key: Option<String>,
}

/// What the confirmation page needs to redraw a booking without asking the
/// backend again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentSnapshot {
    pub date: String,
    pub time: String,
    pub registration_plate: String,
    pub vehicle_type: VehicleType,
}

impl From<&BookingRequest> for AppointmentSnapshot {
    fn from(request: &BookingRequest) -> Self {
        Self {
            date: request.date.clone(),
            time: request.time.clone(),
            registration_plate: request.registration_plate.clone(),
            vehicle_type: request.vehicle_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingBooking {
    pub registration_key: String,
    pub appointment: AppointmentSnapshot,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub remember: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub user_id: Option<WireId>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_admin: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Identifiers come back as numbers or strings depending on the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Number(i64),
    Text(String),
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub user_email: String,
    pub user_id: String,
    pub is_admin: bool,
}

/// SQLite-backed servers report flags as `0`/`1`, sometimes as strings.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Number(i64),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(value)) => value,
        Some(Flag::Number(value)) => value != 0,
        Some(Flag::Text(value)) => matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true"),
        None => false,
    })
}
