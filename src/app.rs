use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/staff", get(handlers::staff))
        .route("/book", get(handlers::booking).post(handlers::booking_submit))
        .route("/book/list", get(handlers::booking_list).post(handlers::booking_list_submit))
        .route("/login", get(handlers::login).post(handlers::login_submit))
        .route("/login/toggle-password", post(handlers::login_toggle_password))
        .route("/register", get(handlers::register).post(handlers::register_submit))
        .route("/register/toggle-password", post(handlers::register_toggle_password))
        .route("/profile", get(handlers::profile_page))
        .route("/profile/open", post(handlers::open_profile))
        .route("/logout", post(handlers::logout))
        .route("/confirmation", get(handlers::confirmation_page))
        .route("/confirmation/home", post(handlers::confirmation_home))
        .with_state(state)
}
