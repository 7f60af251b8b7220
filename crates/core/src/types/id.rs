//! Newtype IDs for type-safe entity references.
//!
//! The backend hands out identifiers that are sometimes JSON numbers and
//! sometimes strings, so every ID keeps whichever form it arrived in. Use the
//! `define_id!` macro to create wrappers that prevent accidentally mixing IDs
//! from different entity types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates an enum with a `Number(i64)` and a `Text(String)` variant with:
/// - untagged `Serialize`/`Deserialize`, so `1` and `"1"` keep their wire form
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `Display` and an infallible `FromStr` (numeric text becomes `Number`)
/// - `From<i64>`, `From<&str>` and `From<String>` implementations
///
/// # Example
///
/// ```rust
/// # use cloudmart_core::define_id;
/// define_id!(ProductId);
/// define_id!(OrderId);
///
/// let product_id: ProductId = "42".parse().unwrap();
/// assert_eq!(product_id, ProductId::Number(42));
///
/// // These are different types, so this won't compile:
/// // let _: ProductId = OrderId::from(42);
/// ```
#[macro_export]
macro_rules! define_id {
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
        #[serde(untagged)]
        pub enum $name {
            /// Numeric identifier.
            Number(i64),
            /// Textual identifier.
            Text(String),
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                match self {
                    Self::Number(id) => write!(f, "{id}"),
                    Self::Text(id) => f.write_str(id),
                }
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::convert::Infallible;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Ok(s.parse::<i64>()
                    .map_or_else(|_| Self::Text(s.to_owned()), Self::Number))
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self::Number(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::Text(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self::Text(id)
            }
        }
    };
}

define_id!(ProductId);
define_id!(OrderId);
define_id!(TicketId);
define_id!(ThreadId);
define_id!(ConversationId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_text_ids_keep_wire_form() {
        let numeric: ProductId = serde_json::from_str("7").unwrap();
        assert_eq!(numeric, ProductId::Number(7));
        assert_eq!(serde_json::to_string(&numeric).unwrap(), "7");

        let text: ProductId = serde_json::from_str("\"sku-7\"").unwrap();
        assert_eq!(text, ProductId::Text("sku-7".to_string()));
        assert_eq!(serde_json::to_string(&text).unwrap(), "\"sku-7\"");
    }

    #[test]
    fn test_number_and_numeric_string_are_distinct() {
        assert_ne!(ProductId::Number(1), ProductId::from("1"));
    }

    #[test]
    fn test_from_str_prefers_number() {
        assert_eq!("12".parse::<OrderId>().unwrap(), OrderId::Number(12));
        assert_eq!(
            "a1b2".parse::<OrderId>().unwrap(),
            OrderId::Text("a1b2".to_string())
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ThreadId::from("thread_abc").to_string(), "thread_abc");
        assert_eq!(TicketId::from(99).to_string(), "99");
    }
}
