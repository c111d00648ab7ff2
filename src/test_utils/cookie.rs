use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Response, header::COOKIE, header::SET_COOKIE},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    create_cookie_key,
    notice::{Notice, take_notice},
};

const TEST_COOKIE_SECRET: &str = "a super secret key for testing";

/// An empty cookie jar using the same key as [get_notice].
pub(crate) fn test_cookie_jar() -> PrivateCookieJar {
    PrivateCookieJar::new(create_cookie_key(TEST_COOKIE_SECRET))
}

/// Read the notice that `response` set, as the next request would see it.
#[track_caller]
pub(crate) fn get_notice(response: &Response<Body>) -> Option<Notice> {
    let cookies = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .collect::<Vec<_>>()
        .join("; ");

    let mut headers = HeaderMap::new();
    headers.insert(
        COOKIE,
        HeaderValue::from_str(&cookies).expect("Invalid cookie header"),
    );

    let jar = PrivateCookieJar::from_headers(&headers, create_cookie_key(TEST_COOKIE_SECRET));
    let (_, notice) = take_notice(jar);

    notice
}
