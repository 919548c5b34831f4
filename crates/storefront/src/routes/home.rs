//! Home page handler.

use askama::Template;
use askama_web::WebTemplate;

use crate::filters;
use crate::middleware::OptionalAuth;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub logged_in: bool,
    pub is_seller: bool,
}

/// Display the home page.
pub async fn home(OptionalAuth(user): OptionalAuth) -> HomeTemplate {
    HomeTemplate {
        logged_in: user.is_some(),
        is_seller: user.is_some_and(|u| u.is_seller()),
    }
}
