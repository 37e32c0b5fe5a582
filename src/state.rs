use crate::api::HttpApi;
use crate::session::ClientState;

#[derive(Clone)]
pub struct AppState {
    pub api: HttpApi,
    pub client: ClientState,
}

impl AppState {
    pub fn new(api: HttpApi, client: ClientState) -> Self {
        Self { api, client }
    }
}
