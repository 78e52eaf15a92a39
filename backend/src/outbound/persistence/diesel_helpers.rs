//! Shared error mapping for Diesel repository implementations.
//!
//! Repositories translate pool and Diesel failures into their own port error
//! through the generic helpers here, passing the port's constructors. Named
//! constraint violations are recognised by constraint name, falling back to
//! the database message when the driver does not report one.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::{debug, warn};

use super::pool::PoolError;

/// Extract a readable message from a pool error.
pub fn map_pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Map pool errors into a repository-specific connection error constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(map_pool_error_message(error))
}

/// Map common Diesel error variants into query/connection constructors.
///
/// Closed connections become connection errors; everything else is a query
/// error with a fixed message so database text never reaches clients.
pub fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

/// Kind of integrity constraint a write violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    Unique,
    ForeignKey,
    Check,
}

/// An integrity violation reported by PostgreSQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub kind: ViolationKind,
    /// Constraint name, or the raw message when the driver omitted it.
    pub constraint: String,
}

impl ConstraintViolation {
    /// Whether the violated constraint is `name`.
    pub fn is(&self, name: &str) -> bool {
        self.constraint.contains(name)
    }
}

/// Classify `error` as a constraint violation, if it is one.
pub fn constraint_violation(error: &DieselError) -> Option<ConstraintViolation> {
    let DieselError::DatabaseError(kind, info) = error else {
        return None;
    };
    let kind = match kind {
        DatabaseErrorKind::UniqueViolation => ViolationKind::Unique,
        DatabaseErrorKind::ForeignKeyViolation => ViolationKind::ForeignKey,
        DatabaseErrorKind::CheckViolation => ViolationKind::Check,
        _ => return None,
    };
    let constraint = info
        .constraint_name()
        .unwrap_or_else(|| info.message())
        .to_owned();
    Some(ConstraintViolation { kind, constraint })
}

/// Log a violation no repository mapping recognised.
pub fn warn_unrecognised_violation(violation: &ConstraintViolation, operation: &str) {
    warn!(
        kind = ?violation.kind,
        constraint = %violation.constraint,
        operation,
        "unrecognised constraint violation - may need specific error mapping"
    );
}

/// Collect row conversion results, mapping the first error through `map_err`.
pub fn collect_rows<T, E>(
    results: impl Iterator<Item = Result<T, String>>,
    map_err: impl FnOnce(String) -> E,
) -> Result<Vec<T>, E> {
    results.collect::<Result<Vec<_>, _>>().map_err(map_err)
}
