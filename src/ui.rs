use crate::format::capitalize;
use crate::pages::booking::{BookingVariant, BookingView};
use crate::pages::confirmation::{COPIED, ConfirmationView};
use crate::pages::home::HomeView;
use crate::pages::login::LoginView;
use crate::pages::profile::ProfileView;
use crate::pages::registration::RegistrationView;
use crate::pages::{AppointmentSummary, Navigation, Page, PasswordVisibility};
use crate::plants::{MAP_CENTER, MAP_ZOOM, RECYCLING_PLANTS, RecyclingPlant, TILE_MAX_ZOOM, TILE_URL};
use serde::Serialize;
use std::fmt::Write as _;

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, head: &str, body: &str) -> String {
    LAYOUT_HTML
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{HEAD}}", head)
        .replace("{{BODY}}", body)
}

fn message(class: &str, text: Option<&str>) -> String {
    match text {
        Some(text) => format!(r#"<div class="{class} show">{}</div>"#, escape_html(text)),
        None => String::new(),
    }
}

/// Always present so the submit guard can reveal it before the response
/// arrives.
fn loading(busy: bool, text: &str) -> String {
    let show = if busy { " show" } else { "" };
    format!(r#"<div class="loading{show}">{text}</div>"#)
}

/// `onsubmit` handler that blocks a second submit and disables `button`
/// while the request is in flight.
fn submit_guard(button: &str) -> String {
    format!(
        r#"onsubmit="if (this.dataset.busy) return false; this.dataset.busy = '1'; document.getElementById('{button}').disabled = true; this.querySelector('.loading').classList.add('show');""#
    )
}

fn disabled(busy: bool) -> &'static str {
    if busy { " disabled" } else { "" }
}

fn checked(on: bool) -> &'static str {
    if on { " checked" } else { "" }
}

/// Password input plus the button that flips its visibility. The current
/// state travels with the form in a hidden field.
fn password_field(
    name: &str,
    label: &str,
    value: &str,
    visibility: PasswordVisibility,
    toggle_action: &str,
) -> String {
    let state_field = if visibility.is_shown() {
        format!(r#"<input type="hidden" name="show{}" value="on" />"#, capitalize(name))
    } else {
        String::new()
    };
    format!(
        r#"<label for="{name}">{label}</label>
      <div class="password-wrapper">
        <input id="{name}" name="{name}" type="{input_type}" value="{value}" />
        <button type="submit" class="toggle-btn" formaction="{toggle_action}" formnovalidate>{button}</button>
      </div>
      {state_field}"#,
        input_type = visibility.input_type(),
        value = escape_html(value),
        button = visibility.button_label(),
    )
}

pub fn render_home(view: &HomeView) -> String {
    let greeting = match &view.user_email {
        Some(email) => format!("<p class=\"subtitle\">Signed in as {}</p>", escape_html(email)),
        None => "<p class=\"subtitle\">Book a slot at your local recycling centre.</p>".to_string(),
    };
    let booking = if view.show_booking {
        format!(r#"<a href="{}" class="btn btn-primary">Book Appointment</a>"#, Page::Book.path())
    } else {
        String::new()
    };
    let body = format!(
        r#"<header>
    <h1>Glasgow Recycling Appointments</h1>
    {greeting}
  </header>
  <div class="button-group">
    {booking}
    <a href="{list}" class="btn btn-secondary">All Appointments</a>
    <form method="post" action="/profile/open">
      <button id="profileBtn" type="submit" class="btn btn-secondary">My Profile</button>
    </form>
  </div>"#,
        list = Page::BookList.path(),
    );
    layout("Home", "", &body)
}

pub fn render_staff(view: &HomeView) -> String {
    let who = view
        .user_email
        .as_deref()
        .map(escape_html)
        .unwrap_or_else(|| "staff".to_string());
    let body = format!(
        r#"<header>
    <h1>Staff Portal</h1>
    <p class="subtitle">Signed in as {who}. Scan a visitor's QR code to check them in.</p>
  </header>
  <div class="button-group">
    <a href="{list}" class="btn btn-primary">All Appointments</a>
    <a href="{profile}" class="btn btn-secondary">My Profile</a>
    <form method="post" action="/logout">
      <button type="submit" class="btn btn-danger">Log Out</button>
    </form>
  </div>"#,
        list = Page::BookList.path(),
        profile = Page::Profile.path(),
    );
    layout("Staff", "", &body)
}

fn render_marker_popup(plant: &RecyclingPlant) -> String {
    let phone = plant
        .phone
        .map(|phone| format!("<p><strong>Phone:</strong> {}</p>", escape_html(phone)))
        .unwrap_or_default();
    format!(
        r#"<div class="plant-popup"><h3>{name}</h3><p><strong>Address:</strong><br>{address}</p><p><strong>Hours:</strong><br>{hours}</p>{phone}<button type="button" class="btn btn-primary select-plant" data-plant="{name}" onclick="selectPlant(this.dataset.plant)">Select This Plant</button></div>"#,
        name = escape_html(plant.name),
        address = escape_html(plant.address),
        hours = escape_html(plant.hours),
    )
}

#[derive(Serialize)]
struct MapMarker {
    lat: f64,
    lng: f64,
    popup: String,
}

/// Marker list embedded in the map script, safe to place inside `<script>`.
pub fn map_markers_json(plants: &[RecyclingPlant]) -> String {
    let markers: Vec<MapMarker> = plants
        .iter()
        .map(|plant| MapMarker {
            lat: plant.lat,
            lng: plant.lng,
            popup: render_marker_popup(plant),
        })
        .collect();
    serde_json::to_string(&markers)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/")
}

fn render_plant_selector(selected: &str) -> String {
    let mut options = String::from(r#"<option value="">Choose a recycling plant...</option>"#);
    for plant in &RECYCLING_PLANTS {
        let _ = write!(
            options,
            r#"<option value="{name}"{selected}>{name}</option>"#,
            name = escape_html(plant.name),
            selected = if plant.name == selected { " selected" } else { "" },
        );
    }
    format!(
        r#"<label for="recyclingPlant">Recycling Plant</label>
      <select id="recyclingPlant" name="recyclingPlant">{options}</select>"#
    )
}

fn render_appointment_table(rows: &[AppointmentSummary]) -> String {
    if rows.is_empty() {
        return r#"<section class="profile-section"><h2>All Appointments</h2><p class="empty">No appointments found.</p></section>"#.to_string();
    }
    let mut body = String::new();
    for row in rows {
        let _ = write!(
            body,
            r#"<tr><td>{date}</td><td>{time}</td><td>{plate}</td><td>{vehicle}</td><td>{plant}</td><td><code>{key}</code></td><td><span class="status-badge {class}">{status}</span></td></tr>"#,
            date = escape_html(&row.date),
            time = escape_html(&row.time),
            plate = escape_html(&row.registration_plate),
            vehicle = row.vehicle,
            plant = escape_html(row.plant_name.as_deref().unwrap_or("-")),
            key = escape_html(&row.registration_key),
            class = row.status.css_class(),
            status = row.status.label(),
        );
    }
    format!(
        r#"<section class="profile-section">
    <h2>All Appointments</h2>
    <table class="appointments-table">
      <thead><tr><th>Date</th><th>Time</th><th>Registration</th><th>Vehicle</th><th>Plant</th><th>Key</th><th>Status</th></tr></thead>
      <tbody>{body}</tbody>
    </table>
  </section>"#
    )
}

pub fn render_booking(view: &BookingView) -> String {
    let form = &view.form;
    let vehicle = if form.vehicle_type.is_empty() { "regular" } else { form.vehicle_type.as_str() };
    let plant = match view.variant {
        BookingVariant::WithMap => render_plant_selector(&form.recycling_plant),
        BookingVariant::WithList => String::new(),
    };
    let action = view.variant.page().path();

    let form_html = format!(
        r#"<form id="appointmentForm" method="post" action="{action}" {guard}>
      {error}
      <label for="date">Date</label>
      <input id="date" name="date" type="date" min="{min}" value="{date}" />
      <label for="time">Time</label>
      <input id="time" name="time" type="time" value="{time}" />
      <label for="registrationPlate">Registration Plate</label>
      <input id="registrationPlate" name="registrationPlate" type="text" value="{plate}" oninput="this.value = this.value.toUpperCase()" />
      <fieldset class="vehicle-type">
        <legend>Vehicle Type</legend>
        <label><input type="radio" name="vehicleType" value="regular"{regular} /> Regular</label>
        <label><input type="radio" name="vehicleType" value="van"{van} /> Van</label>
      </fieldset>
      {plant}
      <button id="submitBtn" type="submit" class="btn btn-primary"{disabled}>Book Appointment</button>
      {loading}
    </form>"#,
        error = message("error", view.error.as_deref()),
        min = view.min_date.format("%Y-%m-%d"),
        date = escape_html(&form.date),
        time = escape_html(&form.time),
        plate = escape_html(&form.registration_plate),
        regular = checked(vehicle == "regular"),
        van = checked(vehicle == "van"),
        disabled = disabled(view.busy),
        loading = loading(view.busy, "Booking your appointment..."),
        guard = submit_guard("submitBtn"),
    );

    match view.variant {
        BookingVariant::WithMap => {
            let map_script = MAP_SCRIPT
                .replace("{{LAT}}", &MAP_CENTER.0.to_string())
                .replace("{{LNG}}", &MAP_CENTER.1.to_string())
                .replace("{{ZOOM}}", &MAP_ZOOM.to_string())
                .replace("{{TILES}}", TILE_URL)
                .replace("{{MAX_ZOOM}}", &TILE_MAX_ZOOM.to_string())
                .replace("{{MARKERS}}", &map_markers_json(view.plants()));
            let body = format!(
                r#"<header><h1>Book an Appointment</h1><p class="subtitle">Pick a recycling centre on the map or from the list.</p></header>
  <div id="map"></div>
  {form_html}
  {map_script}"#
            );
            layout("Book Appointment", LEAFLET_HEAD, &body)
        }
        BookingVariant::WithList => {
            let table = render_appointment_table(view.appointments.as_deref().unwrap_or_default());
            let body = format!(
                r#"<header><h1>Book an Appointment</h1></header>
  {form_html}
  {table}"#
            );
            layout("Appointments", "", &body)
        }
    }
}

pub fn render_login(view: &LoginView) -> String {
    let body = format!(
        r#"<header><h1>Log In</h1></header>
  <form id="loginForm" method="post" action="/login" {guard}>
      {error}
      <label for="email">Email</label>
      <input id="email" name="email" type="email" value="{email}" />
      {password}
      <label class="checkbox"><input id="remember" name="remember" type="checkbox"{remember} /> Remember me</label>
      <button id="loginBtn" type="submit" class="btn btn-primary"{disabled}>Log In</button>
      {loading}
  </form>
  <p>No account yet? <a href="{register}">Register</a></p>"#,
        error = message("error", view.error.as_deref()),
        email = escape_html(&view.email),
        password = password_field(
            "password",
            "Password",
            &view.password,
            view.password_visibility,
            "/login/toggle-password",
        ),
        remember = checked(view.remember),
        disabled = disabled(view.busy),
        loading = loading(view.busy, "Logging in..."),
        guard = submit_guard("loginBtn"),
        register = Page::Register.path(),
    );
    layout("Log In", "", &body)
}

pub fn render_registration(view: &RegistrationView, navigation: Option<Navigation>) -> String {
    let head = match navigation {
        Some(Navigation::After { delay, to }) => format!(
            r#"<meta http-equiv="refresh" content="{};url={}" />"#,
            delay.as_secs(),
            to.path()
        ),
        _ => String::new(),
    };
    let body = format!(
        r#"<header><h1>Create an Account</h1></header>
  <form id="registrationForm" method="post" action="/register" {guard}>
      {error}
      {success}
      <label for="firstName">First Name</label>
      <input id="firstName" name="firstName" type="text" value="{first}" />
      <label for="lastName">Last Name</label>
      <input id="lastName" name="lastName" type="text" value="{last}" />
      <label for="email">Email</label>
      <input id="email" name="email" type="email" value="{email}" />
      <label for="phone">Phone</label>
      <input id="phone" name="phone" type="tel" value="{phone}" />
      {password}
      {confirm}
      <label class="checkbox"><input id="terms" name="terms" type="checkbox"{terms} /> I agree to the Terms of Service and Privacy Policy</label>
      <button id="registerBtn" type="submit" class="btn btn-primary"{disabled}>Register</button>
      {loading}
  </form>
  <p>Already registered? <a href="{login}">Log in</a></p>"#,
        error = message("error", view.error.as_deref()),
        success = message("success", view.success),
        first = escape_html(&view.first_name),
        last = escape_html(&view.last_name),
        email = escape_html(&view.email),
        phone = escape_html(&view.phone),
        password = password_field(
            "password",
            "Password",
            &view.password,
            view.password_visibility,
            "/register/toggle-password?field=password",
        ),
        confirm = password_field(
            "confirmPassword",
            "Confirm Password",
            &view.confirm_password,
            view.confirm_password_visibility,
            "/register/toggle-password?field=confirmPassword",
        ),
        terms = checked(view.terms),
        disabled = disabled(view.busy),
        loading = loading(view.busy, "Creating your account..."),
        guard = submit_guard("registerBtn"),
        login = Page::Login.path(),
    );
    layout("Register", &head, &body)
}

fn render_appointment_card(card: &AppointmentSummary) -> String {
    format!(
        r#"<div class="appointment-card">
        <div class="appointment-header">
          <h3>{plant}</h3>
          <span class="status-badge {class}">{status}</span>
        </div>
        <div class="appointment-details">
          <div><strong>Date:</strong> {date}</div>
          <div><strong>Time:</strong> {time}</div>
          <div><strong>Vehicle:</strong> {plate} ({vehicle})</div>
          <div><strong>Registration Key:</strong> <code>{key}</code></div>
        </div>
        <div class="qr-code-container">
          <img src="{qr}" alt="QR Code" class="qr-code-img" />
          <p class="qr-code-label">Scan at recycling centre</p>
        </div>
      </div>"#,
        plant = escape_html(card.plant_name.as_deref().unwrap_or("Recycling appointment")),
        class = card.status.css_class(),
        status = card.status.label(),
        date = escape_html(&card.date),
        time = escape_html(&card.time),
        plate = escape_html(&card.registration_plate),
        vehicle = card.vehicle,
        key = escape_html(&card.registration_key),
        qr = escape_html(&card.qr_code_url),
    )
}

pub fn render_profile(view: &ProfileView) -> String {
    let body = match view {
        ProfileView::NotLoggedIn => format!(
            r#"<div class="not-logged-in">
    <h2>You are not logged in</h2>
    <p class="subtitle">Please log in to view your profile.</p>
    <div class="button-group">
      <a href="{login}" class="btn btn-primary">Log In</a>
      <a href="{register}" class="btn btn-secondary">Register</a>
    </div>
  </div>"#,
            login = Page::Login.path(),
            register = Page::Register.path(),
        ),
        ProfileView::LoggedIn {
            email,
            user_id,
            appointments,
        } => {
            let appointments_html = if appointments.is_empty() {
                String::new()
            } else {
                let cards: String = appointments.iter().map(render_appointment_card).collect();
                format!(
                    r#"<div class="profile-section">
    <h2>My Appointments</h2>
    <div class="appointments-list">{cards}</div>
  </div>"#
                )
            };
            format!(
                r#"<div class="profile-section">
    <h2>Account Information</h2>
    <div class="profile-info">
      <div class="profile-label">Email:</div>
      <div class="profile-value">{email}</div>
      <div class="profile-label">User ID:</div>
      <div class="profile-value">{user_id}</div>
    </div>
  </div>
  {appointments_html}
  <div class="button-group">
    <a href="{home}" class="btn btn-secondary">Back to Home</a>
    <a href="{book}" class="btn btn-primary">Book Appointment</a>
    <form method="post" action="/logout">
      <button type="submit" class="btn btn-danger">Log Out</button>
    </form>
  </div>"#,
                email = escape_html(email),
                user_id = escape_html(user_id),
                home = Page::Home.path(),
                book = Page::Book.path(),
            )
        }
    };
    layout("My Profile", "", &format!(r#"<div id="profileContent">{body}</div>"#))
}

pub fn render_confirmation(view: &ConfirmationView) -> String {
    let body = format!(
        r#"<header><h1>Appointment Confirmed</h1></header>
  <div id="copyNotice" class="success">{copied}</div>
  <div class="registration-key">
    <span id="registrationKey">{key}</span>
    <button id="copyBtn" type="button" class="btn btn-secondary" data-key="{key}" onclick="copyKey(this.dataset.key)">Copy</button>
  </div>
  <div class="qr-code-container">
    <img id="qrCode" src="{qr}" alt="QR Code" class="qr-code-img" />
    <p class="qr-code-label">Show this code when you arrive</p>
  </div>
  <div class="appointment-details">
    <div><strong>Date:</strong> <span id="appointmentDate">{date}</span></div>
    <div><strong>Time:</strong> <span id="appointmentTime">{time}</span></div>
    <div><strong>Registration:</strong> <span id="registrationPlate">{plate}</span></div>
    <div><strong>Vehicle:</strong> <span id="vehicleType">{vehicle}</span></div>
  </div>
  <form method="post" action="/confirmation/home">
    <button type="submit" class="btn btn-primary">Return Home</button>
  </form>
  {COPY_SCRIPT}"#,
        copied = COPIED,
        key = escape_html(&view.registration_key),
        qr = escape_html(&view.qr_code_url),
        date = escape_html(&view.date),
        time = escape_html(&view.time),
        plate = escape_html(&view.registration_plate),
        vehicle = view.vehicle,
    );
    layout("Confirmation", "", &body)
}

const LEAFLET_HEAD: &str = r#"<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
  <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>"#;

/// Clipboard access only exists in the browser; failures go to the console.
const COPY_SCRIPT: &str = r#"<script>
    function copyKey(key) {
      navigator.clipboard.writeText(key)
        .then(() => document.getElementById('copyNotice').classList.add('show'))
        .catch((err) => console.error('Failed to copy registration key:', err));
    }
  </script>"#;

const MAP_SCRIPT: &str = r#"<script>
    const map = L.map('map').setView([{{LAT}}, {{LNG}}], {{ZOOM}});
    L.tileLayer('{{TILES}}', {
      attribution: '&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors',
      maxZoom: {{MAX_ZOOM}},
    }).addTo(map);
    const markers = {{MARKERS}};
    markers.forEach((marker) => {
      L.marker([marker.lat, marker.lng]).addTo(map).bindPopup(marker.popup);
    });
    function selectPlant(name) {
      const select = document.getElementById('recyclingPlant');
      select.value = name;
      select.dispatchEvent(new Event('change', { bubbles: true }));
      map.closePopup();
    }
  </script>"#;

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}} | Glasgow Recycling Appointments</title>
  {{HEAD}}
  <style>
    :root {
      --bg: #f1f6f0;
      --ink: #1f2a24;
      --accent: #4caf50;
      --accent-dark: #357a38;
      --danger: #c0392b;
      --card: #ffffff;
      --muted: #666666;
      --shadow: 0 18px 40px rgba(31, 42, 36, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, var(--bg), #dcebd9 70%);
      color: var(--ink);
      font-family: "Segoe UI", "Helvetica Neue", Arial, sans-serif;
      display: grid;
      place-items: start center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      border-radius: 20px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
    }

    .subtitle {
      margin: 6px 0 0;
      color: var(--muted);
    }

    form {
      display: grid;
      gap: 10px;
    }

    input[type="text"],
    input[type="email"],
    input[type="tel"],
    input[type="password"],
    input[type="date"],
    input[type="time"],
    select {
      width: 100%;
      padding: 10px 12px;
      border: 1px solid #c9d6c6;
      border-radius: 8px;
      font-size: 1rem;
    }

    #registrationPlate {
      text-transform: uppercase;
    }

    .password-wrapper {
      display: flex;
      gap: 8px;
    }

    .vehicle-type {
      border: 1px solid #c9d6c6;
      border-radius: 8px;
      display: flex;
      gap: 18px;
    }

    .btn {
      display: inline-block;
      padding: 10px 18px;
      border-radius: 8px;
      border: none;
      cursor: pointer;
      font-size: 1rem;
      text-decoration: none;
      text-align: center;
    }

    .btn-primary {
      background: var(--accent);
      color: white;
    }

    .btn-primary:hover {
      background: var(--accent-dark);
    }

    .btn-secondary {
      background: #e4ece2;
      color: var(--ink);
    }

    .btn-danger {
      background: var(--danger);
      color: white;
    }

    .btn[disabled] {
      opacity: 0.6;
      cursor: not-allowed;
    }

    .toggle-btn {
      padding: 0 14px;
      border-radius: 8px;
      border: 1px solid #c9d6c6;
      background: white;
      cursor: pointer;
    }

    .button-group {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
    }

    .error,
    .success,
    .loading {
      display: none;
      padding: 10px 14px;
      border-radius: 8px;
    }

    .error.show {
      display: block;
      background: #fdecea;
      color: var(--danger);
    }

    .success.show {
      display: block;
      background: #e8f5e9;
      color: var(--accent-dark);
    }

    .loading.show {
      display: block;
      color: var(--muted);
    }

    #map {
      height: 360px;
      border-radius: 12px;
    }

    .plant-popup {
      min-width: 200px;
    }

    .plant-popup h3 {
      margin: 0 0 10px;
      color: var(--accent);
    }

    .select-plant {
      width: 100%;
      margin-top: 10px;
      color: white !important;
    }

    .profile-section {
      display: grid;
      gap: 12px;
    }

    .profile-info {
      display: grid;
      grid-template-columns: max-content 1fr;
      gap: 6px 16px;
    }

    .profile-label {
      color: var(--muted);
    }

    .appointments-list {
      display: grid;
      gap: 16px;
    }

    .appointment-card {
      border: 1px solid #dfe8dc;
      border-radius: 12px;
      padding: 16px;
      display: grid;
      gap: 10px;
    }

    .appointment-header {
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    .appointment-header h3 {
      margin: 0;
    }

    .status-badge {
      padding: 4px 10px;
      border-radius: 999px;
      font-size: 0.85rem;
    }

    .status-badge.checked-in {
      background: #e8f5e9;
      color: var(--accent-dark);
    }

    .status-badge.pending {
      background: #fff4e0;
      color: #a86400;
    }

    .qr-code-img {
      width: 180px;
      height: 180px;
    }

    .qr-code-label {
      color: var(--muted);
      font-size: 0.9rem;
    }

    .registration-key {
      display: flex;
      align-items: center;
      gap: 12px;
      font-family: "Courier New", monospace;
      font-size: 1.6rem;
      letter-spacing: 0.12em;
    }

    .appointments-table {
      width: 100%;
      border-collapse: collapse;
    }

    .appointments-table th,
    .appointments-table td {
      text-align: left;
      padding: 8px;
      border-bottom: 1px solid #dfe8dc;
    }

    .not-logged-in {
      text-align: center;
    }

    @media (max-width: 600px) {
      .app {
        padding: 22px;
      }
    }
  </style>
</head>
<body>
  <main class="app">
  {{BODY}}
  </main>
</body>
</html>
"#;
