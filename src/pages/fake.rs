//! Scripted stand-in for the backend used by the page tests.

use crate::api::PortalApi;
use crate::errors::RequestError;
use crate::models::{
    AppointmentsResponse, BookingRequest, LoginRequest, LoginResponse, RegisterRequest,
};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Book(BookingRequest),
    Appointments(Option<String>),
    Login(String, bool),
    Register(String),
    Health,
}

pub struct FakeApi {
    pub calls: Mutex<Vec<Call>>,
    pub book: Result<String, RequestError>,
    pub appointments: Result<AppointmentsResponse, RequestError>,
    pub login: Result<LoginResponse, RequestError>,
    pub register: Result<(), RequestError>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            book: Ok("K3Y5ABCD".into()),
            appointments: Ok(AppointmentsResponse {
                success: true,
                appointments: Vec::new(),
            }),
            login: Ok(LoginResponse {
                success: true,
                user_id: Some(crate::models::WireId::Number(42)),
                is_admin: false,
                error: None,
            }),
            register: Ok(()),
        }
    }
}

impl FakeApi {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl PortalApi for FakeApi {
    async fn book(&self, request: &BookingRequest) -> Result<String, RequestError> {
        self.record(Call::Book(request.clone()));
        self.book.clone()
    }

    async fn appointments(&self, user_id: Option<&str>) -> Result<AppointmentsResponse, RequestError> {
        self.record(Call::Appointments(user_id.map(str::to_string)));
        self.appointments.clone()
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, RequestError> {
        self.record(Call::Login(request.email.clone(), request.remember));
        self.login.clone()
    }

    async fn register(&self, request: &RegisterRequest) -> Result<(), RequestError> {
        self.record(Call::Register(request.email.clone()));
        self.register.clone()
    }

    async fn health(&self) -> Result<(), RequestError> {
        self.record(Call::Health);
        Ok(())
    }

    fn qr_code_url(&self, registration_key: &str) -> String {
        format!("http://backend.test/api/bookings-qr/{registration_key}.png")
    }
}
