use crate::api::PortalApi;
use crate::models::{LoginRequest, SessionRecord};
use crate::pages::{Navigation, Page, PasswordVisibility, checkbox};
use crate::session::{ClientState, StorageScope};
use serde::Deserialize;
use tracing::{error, info};

const LOGIN_FAILED: &str = "Invalid email or password";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, deserialize_with = "checkbox")]
    pub remember: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub show_password: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginView {
    pub email: String,
    pub remember: bool,
    pub password: String,
    pub password_visibility: PasswordVisibility,
    pub error: Option<String>,
    pub busy: bool,
}

#[derive(Debug)]
pub struct LoginPage {
    view: LoginView,
}

impl LoginPage {
    /// Pre-fills the email remembered from an earlier "remember me" login.
    pub fn load(client: &ClientState) -> Self {
        let remembered = client.remembered_email();
        Self {
            view: LoginView {
                remember: remembered.is_some(),
                email: remembered.unwrap_or_default(),
                password: String::new(),
                password_visibility: PasswordVisibility::Hidden,
                error: None,
                busy: false,
            },
        }
    }

    /// Rebuilds the page around values the user already typed.
    pub fn resume(form: &LoginForm) -> Self {
        Self {
            view: LoginView {
                email: form.email.clone(),
                remember: form.remember,
                password: form.password.clone(),
                password_visibility: PasswordVisibility::from_shown(form.show_password),
                error: None,
                busy: false,
            },
        }
    }

    pub fn view(&self) -> &LoginView {
        &self.view
    }

    pub fn into_view(self) -> LoginView {
        self.view
    }

    pub fn toggle_password(&mut self) {
        self.view.password_visibility = self.view.password_visibility.toggled();
    }

    pub async fn submit<A: PortalApi>(
        &mut self,
        form: LoginForm,
        api: &A,
        client: &ClientState,
    ) -> Option<Navigation> {
        if self.view.busy {
            return None;
        }
        self.view.error = None;
        self.view.email = form.email.clone();
        self.view.remember = form.remember;
        self.view.password = form.password.clone();
        self.view.busy = true;

        let request = LoginRequest {
            email: form.email,
            password: form.password,
            remember: form.remember,
        };
        let response = match api.login(&request).await {
            Ok(response) => response,
            Err(err) => {
                error!("login failed: {err}");
                self.view.error = Some(err.user_message(LOGIN_FAILED));
                self.view.busy = false;
                return None;
            }
        };

        let record = SessionRecord {
            user_email: request.email,
            user_id: response
                .user_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            is_admin: response.is_admin,
        };
        let scope = StorageScope::for_remember(request.remember);
        if let Err(err) = client.save_session(scope, &record) {
            error!("failed to store session in {scope:?} scope: {err}");
        }
        info!(user_id = %record.user_id, admin = record.is_admin, "logged in");

        let landing = if record.is_admin { Page::Staff } else { Page::Home };
        Some(Navigation::To(landing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{NETWORK_ERROR, RequestError};
    use crate::models::{LoginResponse, WireId};
    use crate::pages::fake::{Call, FakeApi};
    use crate::session::SESSION_KEYS;

    fn form(remember: bool) -> LoginForm {
        LoginForm {
            email: "resident@example.com".into(),
            password: "hunter22".into(),
            remember,
            show_password: false,
        }
    }

    #[tokio::test]
    async fn remember_uses_durable_scope_only() {
        let api = FakeApi::default();
        let client = ClientState::in_memory();
        let mut page = LoginPage::load(&client);

        let outcome = page.submit(form(true), &api, &client).await;

        assert_eq!(outcome, Some(Navigation::To(Page::Home)));
        for key in SESSION_KEYS {
            assert!(client.store(StorageScope::Durable).get(key).is_some(), "{key}");
            assert!(client.store(StorageScope::Ephemeral).get(key).is_none(), "{key}");
        }
        assert_eq!(
            client.store(StorageScope::Durable).get("userId").as_deref(),
            Some("42")
        );
        assert_eq!(api.calls(), vec![Call::Login("resident@example.com".into(), true)]);
    }

    #[tokio::test]
    async fn without_remember_uses_ephemeral_scope_only() {
        let api = FakeApi::default();
        let client = ClientState::in_memory();
        let mut page = LoginPage::load(&client);
        page.submit(form(true), &api, &client).await;

        let mut page = LoginPage::load(&client);
        page.submit(form(false), &api, &client).await;

        for key in SESSION_KEYS {
            assert!(client.store(StorageScope::Ephemeral).get(key).is_some(), "{key}");
            assert!(client.store(StorageScope::Durable).get(key).is_none(), "{key}");
        }
        assert_eq!(
            client.store(StorageScope::Ephemeral).get("isAdmin").as_deref(),
            Some("false")
        );
    }

    #[tokio::test]
    async fn admins_land_on_staff_page() {
        let api = FakeApi {
            login: Ok(LoginResponse {
                success: true,
                user_id: Some(WireId::Text("staff-1".into())),
                is_admin: true,
                error: None,
            }),
            ..FakeApi::default()
        };
        let client = ClientState::in_memory();
        let mut page = LoginPage::load(&client);
        let outcome = page.submit(form(false), &api, &client).await;
        assert_eq!(outcome, Some(Navigation::To(Page::Staff)));
        assert!(client.is_admin());
    }

    #[tokio::test]
    async fn failures_show_message_and_store_nothing() {
        let api = FakeApi {
            login: Err(RequestError::Rejected {
                status: 401,
                message: None,
            }),
            ..FakeApi::default()
        };
        let client = ClientState::in_memory();
        let mut page = LoginPage::load(&client);
        assert_eq!(page.submit(form(true), &api, &client).await, None);
        assert_eq!(page.view().error.as_deref(), Some("Invalid email or password"));
        assert!(!page.view().busy);
        assert_eq!(client.lookup("userEmail"), None);

        let offline = FakeApi {
            login: Err(RequestError::Transport("refused".into())),
            ..FakeApi::default()
        };
        page.submit(form(true), &offline, &client).await;
        assert_eq!(page.view().error.as_deref(), Some(NETWORK_ERROR));
    }

    #[tokio::test]
    async fn load_prefills_remembered_email() {
        let client = ClientState::in_memory();
        assert_eq!(LoginPage::load(&client).view().email, "");
        assert!(!LoginPage::load(&client).view().remember);

        LoginPage::load(&client)
            .submit(form(true), &FakeApi::default(), &client)
            .await;
        let view = LoginPage::load(&client).into_view();
        assert_eq!(view.email, "resident@example.com");
        assert!(view.remember);
    }

    #[test]
    fn toggle_flips_visibility() {
        let mut page = LoginPage::resume(&form(false));
        assert_eq!(page.view().password_visibility, PasswordVisibility::Hidden);
        assert_eq!(page.view().password, "hunter22");
        page.toggle_password();
        assert_eq!(page.view().password_visibility.input_type(), "text");
        page.toggle_password();
        assert_eq!(page.view().password_visibility.button_label(), "Show");
    }
}
