use serde::{Deserialize, Deserializer};

/// A field in a partial update body.
///
/// Distinguishes a field that was left out (`Missing`) from one sent as `null`
/// and from one carrying a value, including falsy values like `false`, `0` or `""`.
/// Fields using it need `#[serde(default)]` so that absence maps to `Missing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Missing,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Missing
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}

impl<T> Patch<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Patch::Missing)
    }

    /// Writes into a nullable column: `null` clears it, a value replaces it.
    pub fn apply_to(self, target: &mut Option<T>) {
        match self {
            Patch::Missing => {}
            Patch::Null => *target = None,
            Patch::Value(v) => *target = Some(v),
        }
    }
}

impl Patch<String> {
    /// Writes into a required text column. `null` or blank input records
    /// `"{label} is required."` and leaves the target untouched.
    pub fn apply_required(self, target: &mut String, label: &str, errors: &mut Vec<String>) {
        match self {
            Patch::Missing => {}
            Patch::Value(v) if !v.trim().is_empty() => *target = v.trim().to_string(),
            _ => errors.push(format!("{label} is required.")),
        }
    }
}
