//! Shared request parsing helpers for inbound HTTP adapters.
//!
//! Malformed bodies, query strings and path segments become domain errors so
//! every rejection carries the same JSON envelope as handler-level failures.

use actix_web::{HttpRequest, error::JsonPayloadError, error::QueryPayloadError, web};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, ErrorCode as DomainErrorCode, FieldErrors, RecipesLimit, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MalformedBody,
    MalformedQuery,
    InvalidFlag,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MalformedBody => "malformed_body",
            Self::MalformedQuery => "malformed_query",
            Self::InvalidFlag => "invalid_flag",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

fn malformed(code: ErrorCode, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({ "code": code.as_str() }))
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    malformed(ErrorCode::MalformedBody, format!("malformed JSON body: {err}")).into()
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    malformed(ErrorCode::MalformedQuery, format!("malformed query string: {err}")).into()
}

/// JSON extractor configuration answering malformed bodies with 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(8 * 1024 * 1024)
        .error_handler(json_error_handler)
}

/// Query extractor configuration answering malformed query strings with 400.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}

/// Parse a user id from a path segment. Anything that is not a UUID names no
/// user, so it is a 404 rather than a validation failure.
pub(crate) fn parse_user_path(raw: &str) -> Result<UserId, Error> {
    Uuid::parse_str(raw)
        .map(UserId::from_uuid)
        .map_err(|_| Error::not_found("user not found"))
}

/// Parse an integer primary key from a path segment; junk is a 404.
pub(crate) fn parse_id_path(raw: &str, resource: &str) -> Result<i64, Error> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| Error::not_found(format!("{resource} not found")))
}

/// Parse a `0`/`1` style flag from a query string.
pub(crate) fn parse_flag(field: FieldName, raw: &str) -> Result<bool, Error> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" | "" => Ok(false),
        _ => Err(
            Error::invalid_request(format!("{} must be 0 or 1", field.as_str())).with_details(
                json!({ "field": field.as_str(), "value": raw, "code": ErrorCode::InvalidFlag.as_str() }),
            ),
        ),
    }
}

/// Removing a pair that was never there is a client mistake on the
/// favourite, cart and follow endpoints, so it answers 400 rather than 404.
pub(crate) fn absent_relation_is_bad_request(err: Error) -> Error {
    if err.is_relation_absent() {
        err.with_code(DomainErrorCode::InvalidRequest)
    } else {
        err
    }
}

/// Validate the optional `recipes_limit` query parameter.
pub(crate) fn parse_recipes_limit(raw: Option<i64>) -> Result<RecipesLimit, Error> {
    RecipesLimit::new(raw).map_err(|err| FieldErrors::single_error("recipes_limit", &err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use rstest::rstest;

    const FLAG: FieldName = FieldName::new("is_favorited");

    #[rstest]
    #[case("1", true)]
    #[case("true", true)]
    #[case("0", false)]
    #[case("", false)]
    fn flags_accept_numeric_and_word_forms(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(parse_flag(FLAG, raw).expect("valid flag"), expected);
    }

    #[rstest]
    fn unknown_flag_value_names_the_field() {
        let err = parse_flag(FLAG, "maybe").expect_err("invalid flag");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        let details = err.details().expect("details");
        assert_eq!(details["field"], "is_favorited");
        assert_eq!(details["code"], "invalid_flag");
    }

    #[rstest]
    fn non_uuid_user_path_is_not_found() {
        let err = parse_user_path("me-not").expect_err("not a uuid");
        assert_eq!(err.code(), DomainCode::NotFound);
    }

    #[rstest]
    #[case("abc")]
    #[case("0")]
    #[case("-4")]
    fn junk_id_path_is_not_found(#[case] raw: &str) {
        let err = parse_id_path(raw, "recipe").expect_err("junk id");
        assert_eq!(err.code(), DomainCode::NotFound);
        assert_eq!(err.message(), "recipe not found");
    }

    #[rstest]
    fn absent_relation_becomes_bad_request() {
        let err = absent_relation_is_bad_request(Error::relation_absent("not in favorites"));
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(err.message(), "not in favorites");

        let missing = absent_relation_is_bad_request(Error::not_found("recipe not found"));
        assert_eq!(missing.code(), DomainCode::NotFound);
    }

    #[rstest]
    fn recipes_limit_below_minimum_is_a_field_error() {
        let err = parse_recipes_limit(Some(1)).expect_err("too small");
        let details = err.details().expect("details");
        assert!(details["fields"]["recipes_limit"].is_array());
        assert_eq!(parse_recipes_limit(None).expect("absent").get(), None);
    }
}
