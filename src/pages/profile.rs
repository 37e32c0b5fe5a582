use crate::api::PortalApi;
use crate::pages::{AppointmentSummary, Navigation, Page};
use crate::session::{ClientState, USER_EMAIL, USER_ID};
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileView {
    NotLoggedIn,
    LoggedIn {
        email: String,
        user_id: String,
        /// Empty when the user has no bookings or they could not be fetched.
        appointments: Vec<AppointmentSummary>,
    },
}

pub async fn load<A: PortalApi>(api: &A, client: &ClientState) -> ProfileView {
    let (Some(email), Some(user_id)) = (client.lookup(USER_EMAIL), client.lookup(USER_ID)) else {
        return ProfileView::NotLoggedIn;
    };

    let appointments = match api.appointments(Some(&user_id)).await {
        Ok(response) if response.success => response
            .appointments
            .iter()
            .map(|appointment| AppointmentSummary::new(appointment, api))
            .collect(),
        Ok(_) => Vec::new(),
        Err(err) => {
            warn!(%user_id, "failed to load appointments: {err}");
            Vec::new()
        }
    };

    ProfileView::LoggedIn {
        email,
        user_id,
        appointments,
    }
}

/// Forgets the session in both scopes.
pub fn logout(client: &ClientState) -> Navigation {
    match client.clear_session() {
        Ok(()) => info!("logged out"),
        Err(err) => error!("failed to clear session: {err}"),
    }
    Navigation::To(Page::Login)
}
