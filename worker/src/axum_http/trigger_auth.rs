use axum::http::{HeaderMap, header::AUTHORIZATION};

use super::error_responses::TriggerError;

/// Header the hosted-function clients send their key in.
pub const APIKEY_HEADER: &str = "apikey";

/// With no token configured every caller is accepted. Otherwise the token
/// must arrive as `Authorization: Bearer <token>` or in the `apikey` header.
pub fn authorize_trigger(headers: &HeaderMap, expected: Option<&str>) -> Result<(), TriggerError> {
    let Some(expected) = expected else {
        return Ok(());
    };

    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    let bearer = header(AUTHORIZATION.as_str()).and_then(|v| v.strip_prefix("Bearer "));
    let apikey = header(APIKEY_HEADER);

    if bearer == Some(expected) || apikey == Some(expected) {
        Ok(())
    } else {
        Err(TriggerError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(*name, HeaderValue::from_static(*value));
        }
        headers
    }

    #[test]
    fn open_when_no_token_configured() {
        assert!(authorize_trigger(&HeaderMap::new(), None).is_ok());
    }

    #[test]
    fn accepts_bearer_or_apikey() {
        assert!(authorize_trigger(&headers(&[("authorization", "Bearer s3cret")]), Some("s3cret")).is_ok());
        assert!(authorize_trigger(&headers(&[("apikey", "s3cret")]), Some("s3cret")).is_ok());
    }

    #[test]
    fn rejects_missing_or_wrong_token() {
        assert!(matches!(
            authorize_trigger(&HeaderMap::new(), Some("s3cret")),
            Err(TriggerError::Unauthorized)
        ));
        assert!(authorize_trigger(&headers(&[("authorization", "Bearer nope")]), Some("s3cret")).is_err());
        assert!(authorize_trigger(&headers(&[("authorization", "s3cret")]), Some("s3cret")).is_err());
    }
}
