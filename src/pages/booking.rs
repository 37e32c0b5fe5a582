use crate::api::PortalApi;
use crate::errors::ValidationError;
use crate::models::{AppointmentSnapshot, BookingRequest, VehicleType};
use crate::pages::{AppointmentSummary, Navigation, Page};
use crate::plants::{RECYCLING_PLANTS, RecyclingPlant, find_plant};
use crate::session::ClientState;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{error, info, warn};

const BOOKING_FAILED: &str = "Failed to book appointment";

/// The booking page exists in two shapes: the map page, where a plant must
/// be chosen, and the list page, which books without a plant and shows every
/// appointment underneath the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingVariant {
    WithMap,
    WithList,
}

impl BookingVariant {
    pub fn page(self) -> Page {
        match self {
            Self::WithMap => Page::Book,
            Self::WithList => Page::BookList,
        }
    }

    fn requires_plant(self) -> bool {
        self == Self::WithMap
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingForm {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub registration_plate: String,
    #[serde(default)]
    pub vehicle_type: String,
    #[serde(default)]
    pub recycling_plant: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingEvent {
    PlantSelected(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingView {
    pub variant: BookingVariant,
    /// Earliest date the date picker offers.
    pub min_date: NaiveDate,
    pub form: BookingForm,
    pub error: Option<String>,
    pub busy: bool,
    /// Filled on the list page only.
    pub appointments: Option<Vec<AppointmentSummary>>,
}

impl BookingView {
    pub fn plants(&self) -> &'static [RecyclingPlant] {
        if self.variant.requires_plant() {
            &RECYCLING_PLANTS
        } else {
            &[]
        }
    }
}

#[derive(Debug)]
pub struct BookingPage {
    view: BookingView,
}

impl BookingPage {
    pub fn load(variant: BookingVariant, today: NaiveDate) -> Self {
        Self {
            view: BookingView {
                variant,
                min_date: today,
                form: BookingForm::default(),
                error: None,
                busy: false,
                appointments: None,
            },
        }
    }

    pub fn view(&self) -> &BookingView {
        &self.view
    }

    pub fn into_view(self) -> BookingView {
        self.view
    }

    /// Fetches the table shown under the list page's form. A failed fetch
    /// leaves the table empty.
    pub async fn refresh_appointments<A: PortalApi>(&mut self, api: &A) {
        if self.view.variant != BookingVariant::WithList {
            return;
        }
        let rows = match api.appointments(None).await {
            Ok(response) if response.success => response
                .appointments
                .iter()
                .map(|appointment| AppointmentSummary::new(appointment, api))
                .collect(),
            Ok(_) => Vec::new(),
            Err(err) => {
                warn!("failed to load appointments: {err}");
                Vec::new()
            }
        };
        self.view.appointments = Some(rows);
    }

    /// Marker popup action: puts `name` into the plant selector.
    pub fn select_plant(&mut self, name: &str) -> Option<BookingEvent> {
        let plant = find_plant(name)?;
        self.view.form.recycling_plant = plant.name.to_string();
        Some(BookingEvent::PlantSelected(plant.name))
    }

    /// Keystroke feedback for the plate field.
    pub fn input_plate(&mut self, raw: &str) {
        self.view.form.registration_plate = raw.to_uppercase();
    }

    pub async fn submit<A: PortalApi>(
        &mut self,
        form: BookingForm,
        api: &A,
        client: &ClientState,
    ) -> Option<Navigation> {
        if self.view.busy {
            return None;
        }
        self.view.error = None;
        let plate = form.registration_plate.clone();
        self.view.form = form;
        self.input_plate(&plate);

        let request = match validate(&self.view.form, self.view.variant) {
            Ok(request) => request,
            Err(err) => {
                self.view.error = Some(err.to_string());
                return None;
            }
        };

        self.view.busy = true;
        match api.book(&request).await {
            Ok(registration_key) => {
                let snapshot = AppointmentSnapshot::from(&request);
                if let Err(err) = client.stash_pending_booking(&registration_key, &snapshot) {
                    error!("failed to keep booking {registration_key}: {err}");
                }
                info!(%registration_key, date = %request.date, "appointment booked");
                Some(Navigation::To(Page::Confirmation))
            }
            Err(err) => {
                error!("booking failed: {err}");
                self.view.error = Some(err.user_message(BOOKING_FAILED));
                self.view.busy = false;
                None
            }
        }
    }
}

/// Upper-cases the plate and drops all whitespace.
pub fn normalize_plate(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Presence checks only: past dates and odd plate formats are the backend's
/// business.
pub fn validate(form: &BookingForm, variant: BookingVariant) -> Result<BookingRequest, ValidationError> {
    let date = form.date.trim();
    let time = form.time.trim();
    let plate = normalize_plate(&form.registration_plate);
    let vehicle_type = form.vehicle_type.trim();
    let plant = form.recycling_plant.trim();

    if date.is_empty()
        || time.is_empty()
        || plate.is_empty()
        || vehicle_type.is_empty()
        || (variant.requires_plant() && plant.is_empty())
    {
        return Err(ValidationError::MissingFields);
    }
    let vehicle_type: VehicleType = vehicle_type.parse()?;
    if variant.requires_plant() && find_plant(plant).is_none() {
        return Err(ValidationError::UnknownPlant);
    }

    Ok(BookingRequest {
        date: date.to_string(),
        time: time.to_string(),
        registration_plate: plate,
        vehicle_type,
        recycling_plant: variant.requires_plant().then(|| plant.to_string()),
    })
}
