use crate::pages::{Navigation, Page};
use crate::session::{ClientState, USER_EMAIL};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    pub user_email: Option<String>,
    /// Staff check visitors in; they never book.
    pub show_booking: bool,
}

pub fn load(client: &ClientState) -> HomeView {
    HomeView {
        user_email: client.lookup(USER_EMAIL),
        show_booking: !client.is_admin(),
    }
}

pub fn open_profile() -> Navigation {
    Navigation::To(Page::Profile)
}
