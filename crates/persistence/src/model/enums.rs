//! Enumerated field types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when text does not name a variant of an enumerated field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown value '{value}', expected one of {expected}")]
pub struct UnknownVariant {
    /// The rejected text.
    pub value: String,
    /// Accepted names, space separated.
    pub expected: &'static str,
}

/// An enum stored and filtered by its upper-case name.
pub trait NamedEnum:
    Copy + Eq + fmt::Debug + fmt::Display + FromStr<Err = UnknownVariant> + Send + Sync + 'static
{
    /// All variants in declaration order.
    const VARIANTS: &'static [Self];

    /// The stored and serialized name.
    fn as_str(&self) -> &'static str;
}

macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl NamedEnum for $name {
            const VARIANTS: &'static [Self] = &[$( $name::$variant ),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $( $text => Ok($name::$variant), )+
                    other => Err(UnknownVariant {
                        value: other.to_string(),
                        expected: concat!($( $text, " " ),+),
                    }),
                }
            }
        }
    };
}

named_enum! {
    /// Editorial category of a [`Story`](super::Story).
    pub enum StoryCategory {
        /// General news.
        News => "NEWS",
        /// Stories on maternal lineage.
        Matrilineality => "MATRILINEALITY",
    }
}

named_enum! {
    /// Layout template used to render a [`Fragment`](super::Fragment).
    pub enum FragmentTemplate {
        /// First layout.
        V1 => "V1",
        /// Second layout.
        V2 => "V2",
    }
}

named_enum! {
    /// Access level required to see an entity.
    pub enum UserRole {
        /// Administrators only.
        Admin => "ROLE_ADMIN",
        /// Any signed-in user.
        User => "ROLE_USER",
    }
}
