//! Strongly-typed integer IDs for Hetzner Cloud resources.
//!
//! Every resource kind gets its own wrapper so an image ID cannot be passed
//! where a server ID is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Macro to generate strongly-typed ID wrapper types.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $doc:expr) => {
        $(#[$meta])*
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Creates a new ID wrapper.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the raw integer ID.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }

            /// Parses an ID from a string.
            ///
            /// # Errors
            ///
            /// Returns an error if the string is not a positive integer.
            pub fn parse_str(input: &str) -> Result<Self> {
                match input.trim().parse::<u64>() {
                    Ok(id) if id > 0 => Ok(Self(id)),
                    _ => Err(Error::ValidationError(format!(
                        "invalid {}: `{input}`",
                        stringify!($name)
                    ))),
                }
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(wrapper: $name) -> Self {
                wrapper.0
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse_str(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(ServerId, "Server ID");
id_type!(ServerTypeId, "Server type ID");
id_type!(SshKeyId, "SSH key ID");
id_type!(ImageId, "Image ID");
id_type!(ActionId, "Action ID");
id_type!(DatacenterId, "Datacenter ID");
id_type!(LocationId, "Location ID");
