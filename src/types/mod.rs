//! Type definitions module.
//!
//! Contains shared types used across the application.

pub mod cfp;
pub mod stamp;
pub mod transfer;
pub mod units;

pub use cfp::*;
pub use stamp::*;
pub use transfer::*;
pub use units::*;

/// Serialize addresses in EIP-55 checksum form.
pub(crate) mod checksummed {
    use alloy::primitives::Address;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(address: &Address, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&address.to_checksum(None))
    }

    pub mod vec {
        use alloy::primitives::Address;
        use serde::ser::{SerializeSeq, Serializer};

        pub fn serialize<S: Serializer>(
            addresses: &[Address],
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(Some(addresses.len()))?;
            for address in addresses {
                seq.serialize_element(&address.to_checksum(None))?;
            }
            seq.end()
        }
    }
}
