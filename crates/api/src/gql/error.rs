use thiserror::Error;

use crate::settlement::SettlementError;

/// Failure taxonomy for the booking lifecycle. Service-layer functions in
/// the domain modules return this; resolvers convert it with
/// [`BookingResultExt::to_gql`], which logs database detail server-side and
/// hands the client a stable, sanitized message.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("you do not have access to this reservation")]
    Forbidden,

    #[error("this slot is no longer available")]
    SlotUnavailable,

    #[error("no active schedule covers this court on that day")]
    NoScheduleForDay,

    #[error("reservation is already paid")]
    AlreadyPaid,

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("fee split must sum to 10000 basis points")]
    InvalidSplit,

    #[error("settlement transaction not found on the network")]
    SettlementNotFound,

    #[error("settlement could not be verified: {0}")]
    SettlementUnverified(String),

    #[error("on-chain settlement is not configured")]
    SettlementDisabled,

    #[error("settlement network error: {0}")]
    Network(String),

    #[error("internal database error")]
    Db(#[from] sqlx::Error),
}

impl From<SettlementError> for BookingError {
    fn from(e: SettlementError) -> Self {
        match e {
            SettlementError::TransactionNotFound => BookingError::SettlementNotFound,
            SettlementError::Verification(msg) => BookingError::SettlementUnverified(msg),
            SettlementError::Network(msg) => BookingError::Network(msg),
            SettlementError::Rpc { code, message } => {
                BookingError::Network(format!("RPC error (code {code}): {message}"))
            }
        }
    }
}

/// Extension trait that converts `Result<T, BookingError>` into
/// `async_graphql::Result<T>`, logging the underlying detail for database
/// failures before the sanitized message leaves the server.
pub trait BookingResultExt<T> {
    fn to_gql(self) -> std::result::Result<T, async_graphql::Error>;
}

impl<T> BookingResultExt<T> for std::result::Result<T, BookingError> {
    fn to_gql(self) -> std::result::Result<T, async_graphql::Error> {
        self.map_err(|e| {
            if let BookingError::Db(ref db) = e {
                tracing::error!("Database error: {db}");
            }
            async_graphql::Error::new(e.to_string())
        })
    }
}

/// Extension trait that converts any `Result<T, E>` where `E: Display`
/// into `async_graphql::Result<T>` with a contextual message prefix.
///
/// Usage: `Uuid::parse_str(id).gql_err("Invalid court ID")?`
pub trait ResultExt<T> {
    fn gql_err(self, context: &str) -> std::result::Result<T, async_graphql::Error>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    fn gql_err(self, context: &str) -> std::result::Result<T, async_graphql::Error> {
        self.map_err(|e| async_graphql::Error::new(format!("{context}: {e}")))
    }
}

/// Map a reservation insert failure: losing the booking race surfaces as a
/// unique violation on the live-claim index and becomes `SlotUnavailable`.
pub fn claim_error(e: sqlx::Error) -> BookingError {
    if let sqlx::Error::Database(ref db) = e {
        if db.is_unique_violation() {
            return BookingError::SlotUnavailable;
        }
    }
    BookingError::Db(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settlement_errors_map_onto_taxonomy() {
        assert!(matches!(
            BookingError::from(SettlementError::TransactionNotFound),
            BookingError::SettlementNotFound
        ));
        assert!(matches!(
            BookingError::from(SettlementError::Verification("short".into())),
            BookingError::SettlementUnverified(_)
        ));
        assert!(matches!(
            BookingError::from(SettlementError::Network("down".into())),
            BookingError::Network(_)
        ));
    }

    #[test]
    fn messages_are_sanitized() {
        let e = BookingError::Db(sqlx::Error::RowNotFound);
        assert_eq!(e.to_string(), "internal database error");

        let e = BookingError::SlotUnavailable;
        assert_eq!(e.to_string(), "this slot is no longer available");
    }
}
