//! Handlers for `/options`: the option dictionaries with labels in the
//! request language.

use std::collections::BTreeMap;

use adala_core::locale::Lang;
use adala_core::options::{LocalizedOption, OptionKind};
use axum::extract::Path;
use axum::Json;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::locale::RequestLang;
use crate::response::DataResponse;

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub lang: Lang,
    /// `ltr` or `rtl`.
    pub direction: &'static str,
    pub options: BTreeMap<&'static str, Vec<LocalizedOption>>,
}

#[derive(Debug, Serialize)]
pub struct OptionListResponse {
    pub kind: OptionKind,
    pub lang: Lang,
    pub direction: &'static str,
    pub items: Vec<LocalizedOption>,
}

/// GET /api/v1/options
pub async fn all_options(
    _auth: AuthUser,
    RequestLang(lang): RequestLang,
) -> Json<DataResponse<OptionsResponse>> {
    let options = OptionKind::ALL
        .into_iter()
        .map(|kind| (kind.key(), kind.localized(lang)))
        .collect();
    Json(DataResponse {
        data: OptionsResponse {
            lang,
            direction: lang.direction(),
            options,
        },
    })
}

/// GET /api/v1/options/{kind}
pub async fn option_list(
    _auth: AuthUser,
    RequestLang(lang): RequestLang,
    Path(key): Path<String>,
) -> AppResult<Json<DataResponse<OptionListResponse>>> {
    let kind = OptionKind::from_key(&key).ok_or_else(|| {
        let known: Vec<&str> = OptionKind::ALL.iter().map(|k| k.key()).collect();
        AppError::BadRequest(format!(
            "Unknown option list '{key}'. Available: {}",
            known.join(", ")
        ))
    })?;
    Ok(Json(DataResponse {
        data: OptionListResponse {
            kind,
            lang,
            direction: lang.direction(),
            items: kind.localized(lang),
        },
    }))
}
