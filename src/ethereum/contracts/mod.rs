//! Smart contract bindings.

pub mod cfp;
pub mod stamper;
