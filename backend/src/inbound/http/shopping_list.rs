//! Shopping-list download.
//!
//! ```text
//! GET /api/recipes/download_shopping_cart?format=txt|pdf
//! ```
//!
//! Registered before `/recipes/{id}` so the literal segment wins.

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, get, web};
use serde::Deserialize;

use crate::domain::{ExportFormat, FieldErrors};

use super::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;

#[derive(Debug, Default, Deserialize)]
pub struct DownloadQuery {
    pub format: Option<String>,
}

fn export_format(raw: Option<&str>) -> ApiResult<ExportFormat> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(ExportFormat::default()),
        Some(value) => value
            .parse()
            .map_err(|err: crate::domain::UnknownExportFormat| {
                FieldErrors::single_error("format", &err.to_string())
            }),
    }
}

/// The caller's aggregated cart as an attachment.
#[get("/recipes/download_shopping_cart")]
pub async fn download_shopping_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<DownloadQuery>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let format = export_format(query.format.as_deref())?;
    let file = state.shopping_list.export(&user, format).await?;
    Ok(HttpResponse::Ok()
        .content_type(file.content_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file.file_name)],
        })
        .body(file.bytes))
}
