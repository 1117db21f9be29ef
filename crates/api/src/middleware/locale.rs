//! Response language negotiation.
//!
//! Precedence: `?lang=` query parameter, then the first supported
//! `Accept-Language` tag, then `DEFAULT_LANG`.

use std::convert::Infallible;

use adala_core::locale::Lang;
use axum::extract::{FromRequestParts, Query};
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::request::Parts;
use serde::Deserialize;

use crate::state::AppState;

/// Language chosen for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLang(pub Lang);

#[derive(Debug, Deserialize)]
struct LangParam {
    lang: Option<String>,
}

impl RequestLang {
    /// Resolve from request parts without touching state.
    pub fn negotiate(parts: &Parts, default: Lang) -> Lang {
        let from_query = Query::<LangParam>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(p)| p.lang)
            .and_then(|l| l.parse::<Lang>().ok());
        if let Some(lang) = from_query {
            return lang;
        }

        parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .and_then(Lang::from_accept_language)
            .unwrap_or(default)
    }
}

impl FromRequestParts<AppState> for RequestLang {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(RequestLang(Self::negotiate(parts, state.config.default_lang)))
    }
}
