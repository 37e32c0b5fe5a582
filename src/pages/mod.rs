//! Page controllers. Each page exposes a `load` for the initial render and
//! one method per user action; none of them knows how it is being displayed.

pub mod booking;
pub mod confirmation;
pub mod home;
pub mod login;
pub mod profile;
pub mod registration;

#[cfg(test)]
pub(crate) mod fake;

use crate::api::PortalApi;
use crate::format::short_date;
use crate::models::Appointment;
use serde::{Deserialize, Deserializer};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Book,
    BookList,
    Confirmation,
    Login,
    Register,
    Profile,
    Staff,
}

impl Page {
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Book => "/book",
            Self::BookList => "/book/list",
            Self::Confirmation => "/confirmation",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Profile => "/profile",
            Self::Staff => "/staff",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    To(Page),
    After { delay: Duration, to: Page },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordVisibility {
    #[default]
    Hidden,
    Shown,
}

impl PasswordVisibility {
    pub fn from_shown(shown: bool) -> Self {
        if shown { Self::Shown } else { Self::Hidden }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Hidden => Self::Shown,
            Self::Shown => Self::Hidden,
        }
    }

    pub fn is_shown(self) -> bool {
        self == Self::Shown
    }

    pub fn input_type(self) -> &'static str {
        match self {
            Self::Hidden => "password",
            Self::Shown => "text",
        }
    }

    /// Label of the button that flips the state.
    pub fn button_label(self) -> &'static str {
        match self {
            Self::Hidden => "Show",
            Self::Shown => "Hide",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInStatus {
    CheckedIn,
    Pending,
}

impl CheckInStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::CheckedIn => "Checked In",
            Self::Pending => "Pending",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::CheckedIn => "checked-in",
            Self::Pending => "pending",
        }
    }
}

/// An appointment prepared for display.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentSummary {
    pub plant_name: Option<String>,
    pub status: CheckInStatus,
    pub date: String,
    pub time: String,
    pub registration_plate: String,
    pub vehicle: &'static str,
    pub registration_key: String,
    pub qr_code_url: String,
}

impl AppointmentSummary {
    pub fn new(appointment: &Appointment, api: &impl PortalApi) -> Self {
        Self {
            plant_name: appointment.plant_name.clone(),
            status: if appointment.checked_in {
                CheckInStatus::CheckedIn
            } else {
                CheckInStatus::Pending
            },
            date: short_date(&appointment.date),
            time: appointment.time.clone(),
            registration_plate: appointment.registration_plate.clone(),
            vehicle: appointment.vehicle_type.label(),
            registration_key: appointment.registration_key.clone(),
            qr_code_url: api.qr_code_url(&appointment.registration_key),
        }
    }
}

/// HTML checkboxes submit `on` when ticked and nothing otherwise.
pub(crate) fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(matches!(value.as_deref(), Some("on" | "true" | "1")))
}
