//! The `token` cookie set on login and cleared on logout.

use axum_extra::extract::cookie::{Cookie, SameSite};

/// Name of the cookie carrying the bearer token.
pub const TOKEN_COOKIE: &str = "token";

/// Build the http-only cookie holding `token`.
///
/// The cookie has no max-age; the token's own `exp` claim bounds its use.
pub fn token_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .build()
}

/// An expired, empty [`TOKEN_COOKIE`] that makes the browser drop its copy.
///
/// Added to the jar rather than passed to `CookieJar::remove`, which only
/// emits a header when the request itself carried the cookie.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((TOKEN_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build();
    cookie.make_removal();
    cookie
}
