//! Composite key encoding for secondary indexes.
//!
//! A composite key is `U+0000 index U+0000 attr1 U+0000 attr2 U+0000 ...`.
//! The leading `U+0000` keeps composite keys out of the simple key space,
//! and terminating every part with `U+0000` means a partial key is an exact
//! prefix of every full key sharing those leading attributes and of nothing
//! else. Scans run over `[partial, partial + U+10FFFF)`.

use thiserror::Error;

/// Separator and namespace marker for composite keys.
pub const COMPOSITE_KEY_NAMESPACE: char = '\u{0}';

/// Largest code point; used as the exclusive upper bound of prefix scans.
pub const MAX_UNICODE_RUNE: char = '\u{10FFFF}';

/// Errors raised when building or parsing keys.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// Index (object type) name is empty.
    #[error("composite key index name must not be empty")]
    EmptyIndexName,
    /// A key part contains a reserved code point.
    #[error("key part {part:?} contains reserved character U+{code:04X}")]
    ReservedCharacter {
        /// Offending key part.
        part: String,
        /// Code point of the reserved character.
        code: u32,
    },
    /// A simple key starts with the composite key namespace.
    #[error("key {0:?} must not start with U+0000")]
    ReservedPrefix(String),
    /// Key is not a well-formed composite key.
    #[error("not a composite key: {0:?}")]
    NotComposite(String),
}

fn validate_part(part: &str) -> Result<(), KeyError> {
    if let Some(ch) = part
        .chars()
        .find(|&c| c == COMPOSITE_KEY_NAMESPACE || c == MAX_UNICODE_RUNE)
    {
        return Err(KeyError::ReservedCharacter {
            part: part.to_string(),
            code: ch as u32,
        });
    }
    Ok(())
}

/// Builds a composite key from an index name and ordered attribute values.
pub fn make_composite_key<S: AsRef<str>>(index: &str, attributes: &[S]) -> Result<String, KeyError> {
    if index.is_empty() {
        return Err(KeyError::EmptyIndexName);
    }
    validate_part(index)?;

    let mut key = String::with_capacity(
        2 + index.len() + attributes.iter().map(|a| a.as_ref().len() + 1).sum::<usize>(),
    );
    key.push(COMPOSITE_KEY_NAMESPACE);
    key.push_str(index);
    key.push(COMPOSITE_KEY_NAMESPACE);
    for attribute in attributes {
        let attribute = attribute.as_ref();
        validate_part(attribute)?;
        key.push_str(attribute);
        key.push(COMPOSITE_KEY_NAMESPACE);
    }
    Ok(key)
}

/// Splits a composite key back into its index name and attribute values.
pub fn split_composite_key(key: &str) -> Result<(String, Vec<String>), KeyError> {
    let body = key
        .strip_prefix(COMPOSITE_KEY_NAMESPACE)
        .and_then(|rest| rest.strip_suffix(COMPOSITE_KEY_NAMESPACE))
        .ok_or_else(|| KeyError::NotComposite(key.to_string()))?;

    let mut parts = body.split(COMPOSITE_KEY_NAMESPACE);
    let index = match parts.next() {
        Some(index) if !index.is_empty() => index.to_string(),
        _ => return Err(KeyError::NotComposite(key.to_string())),
    };
    Ok((index, parts.map(str::to_string).collect()))
}

/// Returns true if `key` lives in the composite key namespace.
pub fn is_composite_key(key: &str) -> bool {
    key.starts_with(COMPOSITE_KEY_NAMESPACE)
}

/// Rejects simple keys that would collide with the composite namespace.
pub fn validate_simple_key(key: &str) -> Result<(), KeyError> {
    if is_composite_key(key) {
        return Err(KeyError::ReservedPrefix(key.to_string()));
    }
    Ok(())
}

/// Returns the half-open `[start, end)` range covering every composite key of
/// `index` whose leading attributes equal `attributes`.
pub fn partial_key_range<S: AsRef<str>>(
    index: &str,
    attributes: &[S],
) -> Result<(String, String), KeyError> {
    let start = make_composite_key(index, attributes)?;
    let mut end = start.clone();
    end.push(MAX_UNICODE_RUNE);
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_with_namespace_and_terminators() {
        let key = make_composite_key("degree~name", &["me", "as23df"]).unwrap();
        assert_eq!(key, "\u{0}degree~name\u{0}me\u{0}as23df\u{0}");
    }

    #[test]
    fn split_recovers_parts() {
        let key = make_composite_key("degree~name", &["me", "as23df"]).unwrap();
        let (index, attrs) = split_composite_key(&key).unwrap();
        assert_eq!(index, "degree~name");
        assert_eq!(attrs, vec!["me".to_string(), "as23df".to_string()]);
    }

    #[test]
    fn split_keeps_empty_attributes() {
        let key = make_composite_key("idx", &["", "b"]).unwrap();
        let (_, attrs) = split_composite_key(&key).unwrap();
        assert_eq!(attrs, vec!["".to_string(), "b".to_string()]);
    }

    #[test]
    fn split_index_only() {
        let key = make_composite_key::<&str>("idx", &[]).unwrap();
        assert_eq!(split_composite_key(&key).unwrap(), ("idx".to_string(), vec![]));
    }

    #[test]
    fn split_rejects_simple_key() {
        assert!(matches!(
            split_composite_key("as23df"),
            Err(KeyError::NotComposite(_))
        ));
        assert!(split_composite_key("\u{0}").is_err());
        assert!(split_composite_key("\u{0}\u{0}").is_err());
    }

    #[test]
    fn rejects_reserved_characters() {
        assert!(matches!(
            make_composite_key("idx", &["a\u{0}b"]),
            Err(KeyError::ReservedCharacter { code: 0, .. })
        ));
        assert!(matches!(
            make_composite_key("idx", &["a\u{10FFFF}"]),
            Err(KeyError::ReservedCharacter { code: 0x10FFFF, .. })
        ));
        assert_eq!(
            make_composite_key::<&str>("", &[]).unwrap_err(),
            KeyError::EmptyIndexName
        );
    }

    #[test]
    fn partial_range_is_exact_prefix() {
        let (start, end) = partial_key_range("degree~name", &["me"]).unwrap();
        let inside = make_composite_key("degree~name", &["me", "zzz"]).unwrap();
        let longer_degree = make_composite_key("degree~name", &["mec", "a"]).unwrap();
        let other_index = make_composite_key("degree~namex", &["me", "a"]).unwrap();

        assert!(start.as_str() <= inside.as_str() && inside.as_str() < end.as_str());
        assert!(!(start.as_str() <= longer_degree.as_str() && longer_degree.as_str() < end.as_str()));
        assert!(!(start.as_str() <= other_index.as_str() && other_index.as_str() < end.as_str()));
    }

    #[test]
    fn simple_keys_cannot_enter_composite_namespace() {
        assert!(validate_simple_key("as23df").is_ok());
        assert!(matches!(
            validate_simple_key("\u{0}degree~name\u{0}"),
            Err(KeyError::ReservedPrefix(_))
        ));
    }
}
