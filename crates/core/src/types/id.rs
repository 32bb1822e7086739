//! Time-based token IDs for type-safe entity references.
//!
//! Products and baskets are identified by a numeric token derived from the
//! creation time in milliseconds since the Unix epoch, stored as a string.
//! Tokens are unique in practice; the store does not enforce uniqueness.

use std::sync::atomic::{AtomicI64, Ordering};

/// Last token handed out by [`next_token`], shared by every ID type.
static LAST_TOKEN: AtomicI64 = AtomicI64::new(0);

/// Produce the next time-based token.
///
/// Returns the current epoch milliseconds, bumped past the previously issued
/// token when two calls land in the same millisecond.
#[must_use]
pub fn next_token() -> i64 {
    let now = chrono::Utc::now().timestamp_millis();
    let previous = LAST_TOKEN
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or(now);
    now.max(previous + 1)
}

/// Macro to define a type-safe, string-backed token ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `generate()` for a fresh time-based token, `as_str()`
/// - `From<String>` and `Display` implementations
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use roya_core::define_token_id;
/// define_token_id!(InvoiceId);
///
/// let id = InvoiceId::from("1700000000000".to_string());
/// assert_eq!(id.as_str(), "1700000000000");
/// ```
#[macro_export]
macro_rules! define_token_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a fresh ID from the current time.
            #[must_use]
            pub fn generate() -> Self {
                Self($crate::types::id::next_token().to_string())
            }

            /// Get the underlying token.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <String as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <String as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <String as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <String as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

define_token_id!(ProductId);
define_token_id!(BasketId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_numeric() {
        let id = ProductId::generate();
        assert!(id.as_str().parse::<i64>().is_ok());
    }

    #[test]
    fn test_generated_ids_are_strictly_increasing() {
        let ids: Vec<i64> = (0..100).map(|_| next_token()).collect();
        assert!(ids.windows(2).all(|pair| matches!(pair, [a, b] if a < b)));
    }

    #[test]
    fn test_generated_ids_track_wall_clock() {
        let before = chrono::Utc::now().timestamp_millis();
        let token: i64 = BasketId::generate().as_str().parse().unwrap_or_default();
        assert!(token >= before);
    }

    #[test]
    fn test_id_serde_is_transparent() {
        let id = BasketId::from("1700000000000".to_string());
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "\"1700000000000\"");
    }

    #[test]
    fn test_id_display() {
        let id = ProductId::from("42".to_string());
        assert_eq!(id.to_string(), "42");
    }
}
