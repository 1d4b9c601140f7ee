//! # Dispatch Keys
//!
//! A dispatch key names one callable endpoint, e.g. `POI.Add`. Call sites
//! that cannot use `.` in an identifier use the accessor form `POI_Add`.
//!
//! ## Invariant
//!
//! Every segment is non-empty and ASCII alphanumeric. Because neither
//! separator can appear inside a segment, `accessor_name` and
//! `from_accessor` are exact inverses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KeyError;

/// Separator between segments of a dotted dispatch key.
pub const KEY_SEPARATOR: char = '.';

/// Separator between segments of an accessor name.
pub const ACCESSOR_SEPARATOR: char = '_';

/// A validated dotted dispatch key such as `POI.Add`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DispatchKey(String);

impl<'de> Deserialize<'de> for DispatchKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl DispatchKey {
    /// Create a key from its dotted form.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError`] if the input is empty, has an empty segment,
    /// or contains anything other than ASCII alphanumerics and `.`.
    pub fn new(value: impl Into<String>) -> Result<Self, KeyError> {
        let s = value.into();
        validate_segments(&s, KEY_SEPARATOR)?;
        Ok(Self(s))
    }

    /// Parse an accessor name (`POI_Add`) back into its dotted key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError`] under the same rules as [`DispatchKey::new`],
    /// with `_` as the separator.
    pub fn from_accessor(accessor: &str) -> Result<Self, KeyError> {
        validate_segments(accessor, ACCESSOR_SEPARATOR)?;
        Ok(Self(accessor.replace(ACCESSOR_SEPARATOR, ".")))
    }

    /// Accept either the dotted or the accessor form.
    ///
    /// Input containing `.` is parsed as a dotted key; anything else is
    /// parsed as an accessor name. A single segment is valid in both forms.
    pub fn parse_lenient(input: &str) -> Result<Self, KeyError> {
        if input.contains(KEY_SEPARATOR) {
            Self::new(input)
        } else {
            Self::from_accessor(input)
        }
    }

    /// The accessor name: every `.` replaced by `_`.
    pub fn accessor_name(&self) -> String {
        self.0.replace(KEY_SEPARATOR, "_")
    }

    /// Access the dotted key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate the key's segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(KEY_SEPARATOR)
    }
}

fn validate_segments(input: &str, separator: char) -> Result<(), KeyError> {
    if input.is_empty() {
        return Err(KeyError::Empty);
    }
    for segment in input.split(separator) {
        if segment.is_empty() {
            return Err(KeyError::EmptySegment {
                input: input.to_string(),
            });
        }
        if let Some(found) = segment.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(KeyError::InvalidCharacter {
                input: input.to_string(),
                found,
            });
        }
    }
    Ok(())
}

impl FromStr for DispatchKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for DispatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DispatchKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_key_maps_to_underscore_accessor() {
        let key = DispatchKey::new("POI.Add").unwrap();
        assert_eq!(key.accessor_name(), "POI_Add");
        assert_eq!(key.as_str(), "POI.Add");
    }

    #[test]
    fn accessor_maps_back_to_dotted_key() {
        let key = DispatchKey::from_accessor("POI_Add").unwrap();
        assert_eq!(key.as_str(), "POI.Add");
    }

    #[test]
    fn multi_segment_keys_convert_every_separator() {
        let key = DispatchKey::new("Camera.Focus.Set").unwrap();
        assert_eq!(key.accessor_name(), "Camera_Focus_Set");
        assert_eq!(key.segments().collect::<Vec<_>>(), ["Camera", "Focus", "Set"]);
    }

    #[test]
    fn single_segment_is_its_own_accessor() {
        let key = DispatchKey::new("Reset").unwrap();
        assert_eq!(key.accessor_name(), "Reset");
        assert_eq!(DispatchKey::from_accessor("Reset").unwrap(), key);
    }

    #[test]
    fn empty_key_rejected() {
        assert_eq!(DispatchKey::new(""), Err(KeyError::Empty));
        assert_eq!(DispatchKey::from_accessor(""), Err(KeyError::Empty));
    }

    #[test]
    fn empty_segment_rejected() {
        for bad in ["POI..Add", ".POI", "POI."] {
            assert!(
                matches!(DispatchKey::new(bad), Err(KeyError::EmptySegment { .. })),
                "expected EmptySegment for {bad:?}"
            );
        }
        assert!(matches!(
            DispatchKey::from_accessor("POI__Add"),
            Err(KeyError::EmptySegment { .. })
        ));
    }

    #[test]
    fn underscore_inside_dotted_key_rejected() {
        let err = DispatchKey::new("POI.Add_Item").unwrap_err();
        assert_eq!(
            err,
            KeyError::InvalidCharacter {
                input: "POI.Add_Item".to_string(),
                found: '_',
            }
        );
    }

    #[test]
    fn dot_inside_accessor_rejected() {
        assert!(matches!(
            DispatchKey::from_accessor("POI.Add"),
            Err(KeyError::InvalidCharacter { found: '.', .. })
        ));
    }

    #[test]
    fn lenient_parse_accepts_both_forms() {
        let dotted = DispatchKey::parse_lenient("POI.Add").unwrap();
        let accessor = DispatchKey::parse_lenient("POI_Add").unwrap();
        assert_eq!(dotted, accessor);
    }

    #[test]
    fn deserialize_validates() {
        let ok: DispatchKey = serde_json::from_str("\"POI.Add\"").unwrap();
        assert_eq!(ok.as_str(), "POI.Add");
        let bad: Result<DispatchKey, _> = serde_json::from_str("\"POI Add\"");
        assert!(bad.is_err());
    }

    #[test]
    fn display_is_dotted_form() {
        let key: DispatchKey = "POI.Add".parse().unwrap();
        assert_eq!(key.to_string(), "POI.Add");
    }
}
