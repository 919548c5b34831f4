//! Session-related types.
//!
//! The session replaces the original browser-persistent storage: the backend
//! access token plus cached identity attributes, written only at
//! login/registration/logout and read everywhere else through extractors.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use ekart_core::{UserId, UserType};

/// Session-stored user identity.
///
/// Assembled from the individual session keys; the token proves
/// authentication to the backend, the rest are display attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Bearer token for backend calls.
    pub token: String,
    /// User's backend ID.
    pub user_id: UserId,
    /// User's email address.
    pub email: String,
    /// Account type (`customer` or `seller`).
    pub user_type: UserType,
}

impl CurrentUser {
    /// Whether this account may use the seller console.
    #[must_use]
    pub fn is_seller(&self) -> bool {
        self.user_type == UserType::Seller
    }
}

/// Session keys for authentication data.
///
/// Key names are fixed by the original client-storage contract.
pub mod keys {
    /// Key for the backend bearer token.
    pub const ACCESS_TOKEN: &str = "access_token";

    /// Key for the user's backend ID.
    pub const USER_ID: &str = "user_id";

    /// Key for the user's email address.
    pub const USER_EMAIL: &str = "user_email";

    /// Key for the account type.
    pub const USER_TYPE: &str = "user_type";
}

/// Read the current user from the session.
///
/// Returns `None` unless every identity key is present; a session without a
/// token is treated as logged out.
pub async fn load_current_user(session: &Session) -> Option<CurrentUser> {
    let token: String = session.get(keys::ACCESS_TOKEN).await.ok().flatten()?;
    let user_id: UserId = session.get(keys::USER_ID).await.ok().flatten()?;
    let email: String = session.get(keys::USER_EMAIL).await.ok().flatten()?;
    let user_type: UserType = session
        .get(keys::USER_TYPE)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();

    Some(CurrentUser {
        token,
        user_id,
        email,
        user_type,
    })
}

/// Store the current user in the session (login/registration).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn store_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::ACCESS_TOKEN, &user.token).await?;
    session.insert(keys::USER_ID, &user.user_id).await?;
    session.insert(keys::USER_EMAIL, &user.email).await?;
    session.insert(keys::USER_TYPE, user.user_type).await?;
    Ok(())
}

/// Destroy the session entirely (logout).
///
/// # Errors
///
/// Returns an error if the session store rejects the deletion.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
