
#[cfg(feature = "serde")]
pub mod wire;
