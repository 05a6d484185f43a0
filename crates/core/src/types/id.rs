//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. IDs are opaque
//! strings: the seed catalog uses short numeric strings while ids minted at
//! runtime come from [`ProductIdGenerator`].

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>` and `From<&str>` implementations
///
/// # Example
///
/// ```rust
/// # use cannabiabuds_core::define_id;
/// define_id!(OrderId);
/// define_id!(StoreId);
///
/// let order_id = OrderId::new("1");
/// let store_id = StoreId::new("1");
///
/// // These are different types, so this won't compile:
/// // let _: OrderId = store_id;
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
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
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

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(UserId);

/// Mints unique [`ProductId`]s from a millisecond clock.
///
/// The first id issued in a given millisecond is the bare timestamp
/// (`"1718000000000"`); every further id in that millisecond gets a
/// sequence suffix (`"1718000000000-1"`, `"1718000000000-2"`, ...). If the
/// clock stalls or runs backwards the generator keeps counting on the last
/// millisecond it saw, so an id is never issued twice.
#[derive(Debug, Clone, Default)]
pub struct ProductIdGenerator {
    last_millis: Option<i64>,
    sequence: u32,
}

impl ProductIdGenerator {
    /// Create a generator that has not issued any ids yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_millis: None,
            sequence: 0,
        }
    }

    /// Issue the next id using the current wall clock.
    pub fn next_id(&mut self) -> ProductId {
        self.next_at(chrono::Utc::now().timestamp_millis())
    }

    /// Issue the next id as if the clock read `now_millis`.
    pub fn next_at(&mut self, now_millis: i64) -> ProductId {
        match self.last_millis {
            Some(last) if now_millis <= last => match self.sequence.checked_add(1) {
                Some(sequence) => {
                    self.sequence = sequence;
                    ProductId::new(format!("{last}-{sequence}"))
                }
                // Sequence exhausted: borrow the next millisecond.
                None => {
                    let next = last.saturating_add(1);
                    self.last_millis = Some(next);
                    self.sequence = 0;
                    ProductId::new(next.to_string())
                }
            },
            _ => {
                self.last_millis = Some(now_millis);
                self.sequence = 0;
                ProductId::new(now_millis.to_string())
            }
        }
    }
}
