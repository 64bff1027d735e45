// src/command/user.rs

//! Current user lookup.
//!
//! Follows the usual login-name order: `LOGNAME`, `USER`, `LNAME`,
//! `USERNAME`, then the password database entry for the real uid.

const LOGIN_VARS: [&str; 4] = ["LOGNAME", "USER", "LNAME", "USERNAME"];

pub fn current_user() -> Option<String> {
    LOGIN_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|name| !name.is_empty())
        .or_else(user_from_uid)
}

/// True when `orterun` needs `--allow-run-as-root`.
pub fn is_root() -> bool {
    current_user().as_deref() == Some("root")
}

#[cfg(unix)]
fn user_from_uid() -> Option<String> {
    use nix::unistd::{User, getuid};

    User::from_uid(getuid()).ok().flatten().map(|u| u.name)
}

#[cfg(not(unix))]
fn user_from_uid() -> Option<String> {
    None
}
