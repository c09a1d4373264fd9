//! Authentication gate: admin bootstrap, credential checks, and the
//! safe-redirect rule applied to the login `next` parameter.

pub mod sessions;

use crate::config::Config;
use crate::db::users::UserRepository;
use crate::errors::AppResult;
use rusqlite::Connection;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "nightlog_session";

/// Cookie lifetime; the app logs its single operator in "remembered".
pub const SESSION_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

/// Create the admin user from config when the store is empty.
///
/// Called explicitly during startup (never as an import-time side effect)
/// and idempotent: a non-empty store is left untouched, so repeated boots
/// never create a second user.
pub fn ensure_admin_exists(conn: &Connection, config: &Config) -> AppResult<bool> {
    let users = UserRepository::new(conn);
    if users.count()? > 0 {
        return Ok(false);
    }

    let hash = bcrypt::hash(&config.admin_password, bcrypt::DEFAULT_COST)?;
    users.create(&config.admin_user, &hash)?;
    tracing::info!(username = %config.admin_user, "bootstrapped admin user");
    Ok(true)
}

/// Check a username/password pair against the user store.
/// Unknown usernames and failed hash checks are indistinguishable to the
/// caller: both are just "no".
pub fn verify_credentials(conn: &Connection, username: &str, password: &str) -> AppResult<bool> {
    let users = UserRepository::new(conn);
    match users.find_by_username(username)? {
        Some(user) => Ok(bcrypt::verify(password, &user.password)?),
        None => Ok(false),
    }
}

/// Is `target` acceptable as a post-login redirect?
///
/// Only same-origin relative paths qualify: it must start with a single
/// `/`, and must not smuggle a scheme or authority (`//host`, `\`, `:`
/// before the first `/`). Everything else is rejected outright to keep
/// the login endpoint from acting as an open redirector.
pub fn is_safe_redirect(target: &str) -> bool {
    if !target.starts_with('/') {
        return false;
    }
    if target.starts_with("//") || target.starts_with("/\\") {
        return false;
    }
    !target.contains('\\')
}
