//! Wire form of [`StructuredError`]: the bare code string.
//!
//! Deserialization resolves the code through the global
//! [registry](crate::registry). A code this client does not know yet (one
//! introduced by a newer server) degrades to `general_failure` instead of
//! failing the decode.

use super::StructuredError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;

impl Serialize for StructuredError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code.as_str())
    }
}

impl<'de> Deserialize<'de> for StructuredError {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = Cow::<'de, str>::deserialize(deserializer)?;
        Ok(crate::registry::from_code(&code))
    }
}
