//! Wire and domain types shared between the hero API client and its front ends.

pub mod domain;
pub mod error;
pub mod protocol;
