//! Newtype IDs for type-safe entity references.
//!
//! The backend identifies every entity by a numeric id. Use the `define_id!`
//! macro to create wrappers that keep a guild id from being passed where a
//! user id is expected.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Ord`
/// - Conversion methods: `new()`, `as_i64()`
/// - `Display` and `FromStr` so ids round-trip through paths and query strings
///
/// # Example
///
/// ```rust
/// # use meract_core::define_id;
/// define_id!(UserId);
/// define_id!(GuildId);
///
/// let user_id = UserId::new(1);
/// let guild_id: GuildId = "7".parse().unwrap();
///
/// assert_eq!(user_id.to_string(), "1");
/// assert_eq!(guild_id.as_i64(), 7);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(UserId);
define_id!(AdminId);
define_id!(GuildId);
define_id!(StreamId);
define_id!(RankId);
define_id!(AchievementId);
define_id!(ActivityLogId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_parse() {
        let id = StreamId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(" 42 ".parse::<StreamId>().unwrap(), id);
        assert!("forty-two".parse::<StreamId>().is_err());
    }

    #[test]
    fn test_id_serde_is_transparent() {
        let id = UserId::new(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
        let parsed: UserId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_id_ordering() {
        let mut ids = vec![RankId::new(3), RankId::new(1), RankId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![RankId::new(1), RankId::new(2), RankId::new(3)]);
    }
}
