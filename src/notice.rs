//! One-shot notices that survive a redirect.
//!
//! A notice is written to an encrypted cookie by the handler that performs an
//! action, then read and cleared by the next page that is rendered.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::alert::Alert;

/// The name of the cookie that holds the pending notice.
pub const NOTICE_COOKIE: &str = "notice";

/// A message to show the user on the next page they load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "level", content = "message", rename_all = "lowercase")]
pub enum Notice {
    Success(String),
    Error(String),
}

/// Store `notice` in `jar`, replacing any notice that has not been shown yet.
pub fn set_notice(jar: PrivateCookieJar, notice: &Notice) -> PrivateCookieJar {
    let value = match serde_json::to_string(notice) {
        Ok(value) => value,
        Err(error) => {
            tracing::error!("could not serialize notice {notice:?}: {error}");
            return jar;
        }
    };

    jar.add(
        Cookie::build((NOTICE_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict),
    )
}

/// Remove the pending notice from `jar`, returning it if there was one.
///
/// A cookie that cannot be decrypted or parsed is discarded.
pub fn take_notice(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<Notice>) {
    let Some(cookie) = jar.get(NOTICE_COOKIE) else {
        return (jar, None);
    };

    let notice = serde_json::from_str(cookie.value())
        .inspect_err(|error| tracing::warn!("discarding malformed notice cookie: {error}"))
        .ok();

    (jar.remove(Cookie::build(NOTICE_COOKIE).path("/")), notice)
}

/// Render `notice` as an alert banner, or nothing if there is no notice.
pub fn notice_view(notice: Option<Notice>) -> Markup {
    let alert = match notice {
        Some(Notice::Success(message)) => Alert::Success {
            message,
            details: String::new(),
        },
        Some(Notice::Error(message)) => Alert::Error {
            message,
            details: String::new(),
        },
        None => return html! {},
    };

    html! {
        div id="notice" class="w-full max-w-5xl" { (alert.into_html()) }
    }
}
