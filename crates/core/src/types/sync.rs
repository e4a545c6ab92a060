//! Sync ledger enums.
//!
//! Every sync attempt is recorded in the ledger with the entity type it
//! covered and its outcome. Both enums are stored as their upper-case wire
//! form in `TEXT` columns and rendered the same way in API responses.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Entity type covered by a sync attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncEntity {
    Products,
    Customers,
    Orders,
    FullSync,
}

impl SyncEntity {
    /// The stored/wire form of the entity type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Products => "PRODUCTS",
            Self::Customers => "CUSTOMERS",
            Self::Orders => "ORDERS",
            Self::FullSync => "FULL_SYNC",
        }
    }
}

impl std::fmt::Display for SyncEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a sync attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    Success,
    Failed,
}

impl SyncStatus {
    /// The stored/wire form of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a stored sync enum value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sync enum value: {0}")]
pub struct ParseSyncEnumError(String);

impl FromStr for SyncEntity {
    type Err = ParseSyncEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PRODUCTS" => Ok(Self::Products),
            "CUSTOMERS" => Ok(Self::Customers),
            "ORDERS" => Ok(Self::Orders),
            "FULL_SYNC" => Ok(Self::FullSync),
            other => Err(ParseSyncEnumError(other.to_string())),
        }
    }
}

impl FromStr for SyncStatus {
    type Err = ParseSyncEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUCCESS" => Ok(Self::Success),
            "FAILED" => Ok(Self::Failed),
            other => Err(ParseSyncEnumError(other.to_string())),
        }
    }
}

#[cfg(feature = "postgres")]
mod postgres {
    use super::{SyncEntity, SyncStatus};

    impl ::sqlx::Type<::sqlx::Postgres> for SyncEntity {
        fn type_info() -> ::sqlx::postgres::PgTypeInfo {
            <String as ::sqlx::Type<::sqlx::Postgres>>::type_info()
        }

        fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
            <String as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
        }
    }

    impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for SyncEntity {
        fn decode(
            value: ::sqlx::postgres::PgValueRef<'r>,
        ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
            let raw = <String as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
            raw.parse().map_err(Into::into)
        }
    }

    impl ::sqlx::Encode<'_, ::sqlx::Postgres> for SyncEntity {
        fn encode_by_ref(
            &self,
            buf: &mut ::sqlx::postgres::PgArgumentBuffer,
        ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
            <String as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(
                &self.as_str().to_owned(),
                buf,
            )
        }
    }

    impl ::sqlx::Type<::sqlx::Postgres> for SyncStatus {
        fn type_info() -> ::sqlx::postgres::PgTypeInfo {
            <String as ::sqlx::Type<::sqlx::Postgres>>::type_info()
        }

        fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
            <String as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
        }
    }

    impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for SyncStatus {
        fn decode(
            value: ::sqlx::postgres::PgValueRef<'r>,
        ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
            let raw = <String as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
            raw.parse().map_err(Into::into)
        }
    }

    impl ::sqlx::Encode<'_, ::sqlx::Postgres> for SyncStatus {
        fn encode_by_ref(
            &self,
            buf: &mut ::sqlx::postgres::PgArgumentBuffer,
        ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
            <String as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(
                &self.as_str().to_owned(),
                buf,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_round_trip() {
        for entity in [
            SyncEntity::Products,
            SyncEntity::Customers,
            SyncEntity::Orders,
            SyncEntity::FullSync,
        ] {
            assert_eq!(entity.as_str().parse::<SyncEntity>(), Ok(entity));
        }
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!("SUCCESS".parse::<SyncStatus>(), Ok(SyncStatus::Success));
        assert_eq!("FAILED".parse::<SyncStatus>(), Ok(SyncStatus::Failed));
    }

    #[test]
    fn test_unknown_value_is_rejected() {
        let err = "PARTIAL".parse::<SyncStatus>().expect_err("must reject");
        assert_eq!(err.to_string(), "unknown sync enum value: PARTIAL");
    }

    #[test]
    fn test_serde_uses_wire_form() {
        let json = serde_json::to_string(&SyncEntity::FullSync).expect("serialize");
        assert_eq!(json, "\"FULL_SYNC\"");
    }
}
