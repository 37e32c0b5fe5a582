use crate::api::PortalApi;
use crate::format::long_date;
use crate::pages::{Navigation, Page};
use crate::session::ClientState;
use tracing::{error, info};

/// Shown by the page script once the browser accepts the copy.
pub const COPIED: &str = "Registration key copied to clipboard!";

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationView {
    pub registration_key: String,
    pub qr_code_url: String,
    pub date: String,
    pub time: String,
    pub registration_plate: String,
    pub vehicle: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmationOutcome {
    Show(ConfirmationView),
    /// Nothing was booked in this session.
    Redirect(Navigation),
}

pub fn load<A: PortalApi>(api: &A, client: &ClientState) -> ConfirmationOutcome {
    let Some(pending) = client.pending_booking() else {
        return ConfirmationOutcome::Redirect(Navigation::To(Page::Book));
    };
    let appointment = pending.appointment;

    ConfirmationOutcome::Show(ConfirmationView {
        qr_code_url: api.qr_code_url(&pending.registration_key),
        registration_key: pending.registration_key,
        date: long_date(&appointment.date),
        time: appointment.time,
        registration_plate: appointment.registration_plate,
        vehicle: appointment.vehicle_type.label(),
    })
}

pub fn return_home(client: &ClientState) -> Navigation {
    match client.clear_pending_booking() {
        Ok(()) => info!("cleared pending booking"),
        Err(err) => error!("failed to clear pending booking: {err}"),
    }
    Navigation::To(Page::Home)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentSnapshot, VehicleType};
    use crate::pages::fake::FakeApi;
    use crate::session::{APPOINTMENT_DATA, REGISTRATION_KEY, StorageScope};

    fn booked() -> ClientState {
        let client = ClientState::in_memory();
        client
            .stash_pending_booking(
                "K3Y5ABCD",
                &AppointmentSnapshot {
                    date: "2025-01-01".into(),
                    time: "10:00".into(),
                    registration_plate: "AB12CDE".into(),
                    vehicle_type: VehicleType::Van,
                },
            )
            .unwrap();
        client
    }

    fn shown(outcome: ConfirmationOutcome) -> ConfirmationView {
        match outcome {
            ConfirmationOutcome::Show(view) => view,
            ConfirmationOutcome::Redirect(nav) => panic!("unexpected redirect to {nav:?}"),
        }
    }

    #[test]
    fn renders_the_stored_booking() {
        let view = shown(load(&FakeApi::default(), &booked()));
        assert_eq!(view.registration_key, "K3Y5ABCD");
        assert_eq!(view.qr_code_url, "http://backend.test/api/bookings-qr/K3Y5ABCD.png");
        assert_eq!(view.date, "Wednesday 1 January 2025");
        assert_eq!(view.vehicle, "Van");
        assert_eq!(view.registration_plate, "AB12CDE");
    }

    #[test]
    fn missing_either_key_redirects_to_booking() {
        let expected = ConfirmationOutcome::Redirect(Navigation::To(Page::Book));
        assert_eq!(load(&FakeApi::default(), &ClientState::in_memory()), expected);

        let client = booked();
        client.store(StorageScope::Ephemeral).remove(REGISTRATION_KEY).unwrap();
        assert_eq!(load(&FakeApi::default(), &client), expected);

        let client = booked();
        client.store(StorageScope::Ephemeral).remove(APPOINTMENT_DATA).unwrap();
        assert_eq!(load(&FakeApi::default(), &client), expected);
    }

    #[test]
    fn return_home_consumes_the_booking() {
        let client = booked();
        assert_eq!(return_home(&client), Navigation::To(Page::Home));
        assert_eq!(client.pending_booking(), None);
        assert_eq!(
            load(&FakeApi::default(), &client),
            ConfirmationOutcome::Redirect(Navigation::To(Page::Book))
        );
    }
}
