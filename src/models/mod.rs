pub mod job;
pub mod candidate;
pub mod export;
pub mod history;

pub use job::*;
pub use candidate::*;
pub use export::*;
pub use history::*;

use serde::{Deserialize, Deserializer};

/// Treat an explicit `null` list the same as a missing one.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
