//! Bearer credential extraction from the `Authorization` header.

use actix_web::http::header::{AUTHORIZATION, HeaderMap};

const SCHEME: &str = "bearer";

/// Return the raw credential from `Authorization: Bearer <credential>`.
///
/// Absent headers, non-UTF-8 values, other schemes, and empty credentials all
/// yield `None`; the access pipeline reports every case as the same
/// authentication failure.
///
/// # Examples
/// ```
/// use actix_web::http::header::{AUTHORIZATION, HeaderMap, HeaderValue};
/// use access_pipeline::inbound::http::bearer::bearer_credential;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
/// assert_eq!(bearer_credential(&headers), Some("abc.def.ghi"));
/// ```
pub fn bearer_credential(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, credential) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(SCHEME) {
        return None;
    }
    let credential = credential.trim();
    (!credential.is_empty() && !credential.contains(' ')).then_some(credential)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::HeaderValue;
    use rstest::rstest;

    fn headers(value: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = value {
            headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        }
        headers
    }

    #[rstest]
    #[case(Some("Bearer token"), Some("token"))]
    #[case(Some("bearer token"), Some("token"))]
    #[case(Some("  Bearer   token  "), Some("token"))]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("Bearer"), None)]
    #[case(Some("Bearer "), None)]
    #[case(Some("Basic dXNlcjpwYXNz"), None)]
    #[case(Some("Bearer two parts"), None)]
    #[case(Some("Bearertoken"), None)]
    fn extracts_only_well_formed_bearer_values(
        #[case] header: Option<&'static str>,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(bearer_credential(&headers(header)), expected);
    }
}
