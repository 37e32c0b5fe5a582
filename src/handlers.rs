use crate::errors::AppError;
use crate::pages::booking::{BookingEvent, BookingForm, BookingPage, BookingVariant};
use crate::pages::login::{LoginForm, LoginPage};
use crate::pages::registration::{PasswordField, RegistrationForm, RegistrationPage};
use crate::pages::{Navigation, confirmation, home, profile};
use crate::state::AppState;
use crate::ui;
use axum::{
    Form,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
pub struct PlantQuery {
    pub plant: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleQuery {
    pub field: PasswordField,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(ui::render_home(&home::load(&state.client)))
}

pub async fn staff(State(state): State<AppState>) -> Html<String> {
    Html(ui::render_staff(&home::load(&state.client)))
}

pub async fn open_profile() -> Response {
    navigate(home::open_profile())
}

pub async fn booking(Query(query): Query<PlantQuery>) -> Result<Html<String>, AppError> {
    let mut page = BookingPage::load(BookingVariant::WithMap, today());
    if let Some(plant) = query.plant.as_deref() {
        match page.select_plant(plant) {
            Some(BookingEvent::PlantSelected(name)) => debug!(plant = name, "plant selected"),
            None => {
                warn!("rejecting unknown plant {plant:?}");
                return Err(AppError::bad_request("Unknown recycling plant"));
            }
        }
    }
    Ok(Html(ui::render_booking(page.view())))
}

pub async fn booking_submit(State(state): State<AppState>, Form(form): Form<BookingForm>) -> Response {
    submit_booking(&state, BookingVariant::WithMap, form).await
}

pub async fn booking_list(State(state): State<AppState>) -> Html<String> {
    let mut page = BookingPage::load(BookingVariant::WithList, today());
    page.refresh_appointments(&state.api).await;
    Html(ui::render_booking(page.view()))
}

pub async fn booking_list_submit(
    State(state): State<AppState>,
    Form(form): Form<BookingForm>,
) -> Response {
    submit_booking(&state, BookingVariant::WithList, form).await
}

async fn submit_booking(state: &AppState, variant: BookingVariant, form: BookingForm) -> Response {
    let mut page = BookingPage::load(variant, today());
    if let Some(navigation) = page.submit(form, &state.api, &state.client).await {
        return navigate(navigation);
    }
    page.refresh_appointments(&state.api).await;
    Html(ui::render_booking(page.view())).into_response()
}

pub async fn login(State(state): State<AppState>) -> Html<String> {
    Html(ui::render_login(LoginPage::load(&state.client).view()))
}

pub async fn login_submit(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let mut page = LoginPage::resume(&form);
    match page.submit(form, &state.api, &state.client).await {
        Some(navigation) => navigate(navigation),
        None => Html(ui::render_login(page.view())).into_response(),
    }
}

pub async fn login_toggle_password(Form(form): Form<LoginForm>) -> Html<String> {
    let mut page = LoginPage::resume(&form);
    page.toggle_password();
    Html(ui::render_login(page.view()))
}

pub async fn register() -> Html<String> {
    Html(ui::render_registration(RegistrationPage::load().view(), None))
}

pub async fn register_submit(
    State(state): State<AppState>,
    Form(form): Form<RegistrationForm>,
) -> Response {
    let mut page = RegistrationPage::resume(&form);
    match page.submit(form, &state.api).await {
        Some(Navigation::To(target)) => Redirect::to(target.path()).into_response(),
        navigation => Html(ui::render_registration(page.view(), navigation)).into_response(),
    }
}

pub async fn register_toggle_password(
    Query(query): Query<ToggleQuery>,
    Form(form): Form<RegistrationForm>,
) -> Html<String> {
    let mut page = RegistrationPage::resume(&form);
    page.toggle_password(query.field);
    Html(ui::render_registration(page.view(), None))
}

pub async fn profile_page(State(state): State<AppState>) -> Html<String> {
    let view = profile::load(&state.api, &state.client).await;
    Html(ui::render_profile(&view))
}

pub async fn logout(State(state): State<AppState>) -> Response {
    navigate(profile::logout(&state.client))
}

pub async fn confirmation_page(State(state): State<AppState>) -> Response {
    match confirmation::load(&state.api, &state.client) {
        confirmation::ConfirmationOutcome::Show(view) => {
            Html(ui::render_confirmation(&view)).into_response()
        }
        confirmation::ConfirmationOutcome::Redirect(navigation) => navigate(navigation),
    }
}

pub async fn confirmation_home(State(state): State<AppState>) -> Response {
    navigate(confirmation::return_home(&state.client))
}

/// Delayed navigation only makes sense on a rendered page, so a bare
/// redirect goes straight to the target.
fn navigate(navigation: Navigation) -> Response {
    let target = match navigation {
        Navigation::To(page) | Navigation::After { to: page, .. } => page,
    };
    Redirect::to(target.path()).into_response()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
