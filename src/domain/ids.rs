use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares a string-backed identifier newtype.
///
/// Ids are minted by the owning actor as `<prefix>_<n>`; callers only ever
/// receive and pass them back.
macro_rules! string_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Builds the id for the `n`th entity minted by a counter.
            pub fn sequential(n: u64) -> Self {
                Self(format!("{}_{}", $prefix, n))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(UserId, "user");
string_id!(RestaurantId, "restaurant");
string_id!(MenuItemId, "item");
string_id!(OrderId, "order");
string_id!(ReviewId, "review");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_carry_prefix() {
        assert_eq!(OrderId::sequential(7).as_str(), "order_7");
        assert_eq!(MenuItemId::sequential(1).to_string(), "item_1");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&UserId::from("user_3")).unwrap();
        assert_eq!(json, "\"user_3\"");
        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, UserId::from("user_3"));
    }
}
