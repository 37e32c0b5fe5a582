use crate::api::PortalApi;
use crate::errors::ValidationError;
use crate::models::RegisterRequest;
use crate::pages::{Navigation, Page, PasswordVisibility, checkbox};
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info};

const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";
pub const REGISTERED: &str = "Account created successfully! Redirecting to login...";
pub const MIN_PASSWORD_LEN: usize = 6;
pub const REDIRECT_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default, deserialize_with = "checkbox")]
    pub terms: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub show_password: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub show_confirm_password: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PasswordField {
    Password,
    ConfirmPassword,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationView {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub terms: bool,
    pub password: String,
    pub confirm_password: String,
    pub password_visibility: PasswordVisibility,
    pub confirm_password_visibility: PasswordVisibility,
    pub error: Option<String>,
    pub success: Option<&'static str>,
    pub busy: bool,
}

#[derive(Debug)]
pub struct RegistrationPage {
    view: RegistrationView,
}

impl RegistrationPage {
    pub fn load() -> Self {
        Self::resume(&RegistrationForm::default())
    }

    pub fn resume(form: &RegistrationForm) -> Self {
        Self {
            view: RegistrationView {
                first_name: form.first_name.clone(),
                last_name: form.last_name.clone(),
                email: form.email.clone(),
                phone: form.phone.clone(),
                terms: form.terms,
                password: form.password.clone(),
                confirm_password: form.confirm_password.clone(),
                password_visibility: PasswordVisibility::from_shown(form.show_password),
                confirm_password_visibility: PasswordVisibility::from_shown(
                    form.show_confirm_password,
                ),
                error: None,
                success: None,
                busy: false,
            },
        }
    }

    pub fn view(&self) -> &RegistrationView {
        &self.view
    }

    pub fn into_view(self) -> RegistrationView {
        self.view
    }

    /// Each password field has its own toggle.
    pub fn toggle_password(&mut self, field: PasswordField) {
        let visibility = match field {
            PasswordField::Password => &mut self.view.password_visibility,
            PasswordField::ConfirmPassword => &mut self.view.confirm_password_visibility,
        };
        *visibility = visibility.toggled();
    }

    pub async fn submit<A: PortalApi>(
        &mut self,
        form: RegistrationForm,
        api: &A,
    ) -> Option<Navigation> {
        if self.view.busy {
            return None;
        }
        *self = Self::resume(&form);

        let request = match validate(form) {
            Ok(request) => request,
            Err(err) => {
                self.view.error = Some(err.to_string());
                return None;
            }
        };

        self.view.busy = true;
        match api.register(&request).await {
            Ok(()) => {
                info!(email = %request.email, "account registered");
                self.view.success = Some(REGISTERED);
                Some(Navigation::After {
                    delay: REDIRECT_DELAY,
                    to: Page::Login,
                })
            }
            Err(err) => {
                error!("registration failed: {err}");
                self.view.error = Some(err.user_message(REGISTRATION_FAILED));
                self.view.busy = false;
                None
            }
        }
    }
}

/// Terms first, then matching passwords, then length; the first failure
/// is the one reported.
pub fn validate(form: RegistrationForm) -> Result<RegisterRequest, ValidationError> {
    if !form.terms {
        return Err(ValidationError::TermsNotAccepted);
    }
    if form.password != form.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    // Browsers measure input length in UTF-16 code units.
    if form.password.encode_utf16().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }

    Ok(RegisterRequest {
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        email: form.email.trim().to_string(),
        phone: form.phone.trim().to_string(),
        password: form.password,
    })
}
