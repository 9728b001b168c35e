use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

pub const SESSION_COOKIE: &str = "authUser";

/// Session token carried by the request, if any.
///
/// The `authUser` cookie wins; an `Authorization: Bearer` header is accepted
/// when no cookie is present. Verification is left to the auth service.
pub struct SessionToken(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        if let Some(cookie) = jar.get(SESSION_COOKIE) {
            return Ok(Self(Some(cookie.value().to_owned())));
        }

        let bearer = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer ").or_else(|| h.strip_prefix("bearer ")))
            .map(|t| t.trim().to_owned());

        Ok(Self(bearer))
    }
}

pub fn session_cookie(token: String, secure: bool, max_age: Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(max_age)
        .build()
}

/// An expired `authUser` cookie; sent unconditionally so the browser drops it.
pub fn cleared_session_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = session_cookie(String::new(), secure, Duration::ZERO);
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, Request};

    async fn extract(req: Request<()>) -> Option<String> {
        let (mut parts, _) = req.into_parts();
        let SessionToken(token) = SessionToken::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        token
    }

    #[tokio::test]
    async fn reads_cookie() {
        let req = Request::builder()
            .header(header::COOKIE, "theme=dark; authUser=abc.def.ghi")
            .body(())
            .unwrap();
        assert_eq!(extract(req).await.as_deref(), Some("abc.def.ghi"));
    }

    #[tokio::test]
    async fn falls_back_to_bearer_header() {
        let req = Request::builder()
            .header(header::AUTHORIZATION, "Bearer tok")
            .body(())
            .unwrap();
        assert_eq!(extract(req).await.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn cookie_takes_precedence_over_header() {
        let req = Request::builder()
            .header(header::COOKIE, "authUser=from-cookie")
            .header(header::AUTHORIZATION, "Bearer from-header")
            .body(())
            .unwrap();
        assert_eq!(extract(req).await.as_deref(), Some("from-cookie"));
    }

    #[tokio::test]
    async fn absent_or_other_scheme_is_none() {
        assert_eq!(extract(Request::new(())).await, None);
        let req = Request::builder()
            .header(header::AUTHORIZATION, "Basic Zm9vOmJhcg==")
            .body(())
            .unwrap();
        assert_eq!(extract(req).await, None);
    }

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("t".into(), false, Duration::days(7));
        let rendered = cookie.to_string();
        assert!(rendered.starts_with("authUser=t"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("SameSite=Lax"));
        assert!(rendered.contains("Max-Age=604800"));
        assert!(rendered.contains("Path=/"));
        assert!(!rendered.contains("Secure"));

        let secure = session_cookie("t".into(), true, Duration::days(7));
        assert!(secure.to_string().contains("Secure"));
    }

    #[test]
    fn cleared_cookie_expires_immediately() {
        let rendered = cleared_session_cookie(false).to_string();
        assert!(rendered.starts_with("authUser=;"));
        assert!(rendered.contains("Max-Age=0"));
    }
}
