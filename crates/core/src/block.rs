//! Blocks and their property lists

use crate::error::{DecodeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named block with an ordered, key-unique property list
///
/// Text form is `name` or `name<key=value, key2=value2>`. Names, keys and
/// values are checked on the way in so every block writes back to text that
/// decodes to the same block. Blocks decoded from one placement line are
/// shared between all of that line's coordinates through an `Arc`, so a block
/// is not changed once it has been placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "BlockData")]
pub struct Block {
    name: String,
    properties: Vec<(String, String)>,
}

#[derive(Deserialize)]
struct BlockData {
    name: String,
    #[serde(default)]
    properties: Vec<(String, String)>,
}

impl TryFrom<BlockData> for Block {
    type Error = DecodeError;

    fn try_from(data: BlockData) -> Result<Self> {
        data.properties
            .into_iter()
            .try_fold(Block::new(data.name)?, |block, (k, v)| block.with_property(k, v))
    }
}

/// Characters the block text form uses as delimiters
const RESERVED: &[char] = &['<', '>', ',', '=', ':'];

/// Check one name, key or value against what the text form can carry
fn check_text(text: &str, what: &str, allow_empty: bool) -> Result<()> {
    if text.is_empty() {
        if allow_empty {
            return Ok(());
        }
        return Err(DecodeError::block(text, format!("empty {}", what)));
    }
    if text.trim() != text {
        return Err(DecodeError::block(text, format!("{} has surrounding whitespace", what)));
    }
    if text.chars().any(char::is_control) {
        return Err(DecodeError::block(text, format!("{} contains a control character", what)));
    }
    Ok(())
}

impl Block {
    /// Create a block with no properties
    ///
    /// The name must be non-empty, carry no surrounding whitespace and avoid
    /// `<`, `>` and `:`.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        check_text(&name, "block name", false)?;
        if let Some(c) = name.chars().find(|c| matches!(c, '<' | '>' | ':')) {
            return Err(DecodeError::block(&name, format!("block name contains '{}'", c)));
        }
        Ok(Self {
            name,
            properties: Vec::new(),
        })
    }

    /// Builder form of [`Block::set_property`]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        self.set_property(key, value)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set a property, overwriting an existing key in place
    ///
    /// Keys must be non-empty; values may be empty. Neither may carry
    /// surrounding whitespace or any of `< > , = :`.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        let value = value.into();
        check_text(&key, "property key", false)?;
        check_text(&value, "property value", true)?;
        for text in [&key, &value] {
            if let Some(c) = text.chars().find(|c| RESERVED.contains(c)) {
                return Err(DecodeError::block(text, format!("property text contains '{}'", c)));
            }
        }

        match self.properties.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.properties.push((key, value)),
        }
        Ok(())
    }

    /// Get a property value
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Remove a property, returning its value if it was set
    pub fn remove_property(&mut self, key: &str) -> Option<String> {
        let index = self.properties.iter().position(|(k, _)| k == key)?;
        Some(self.properties.remove(index).1)
    }

    /// Properties in their current order
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    pub fn has_properties(&self) -> bool {
        !self.properties.is_empty()
    }
}

/// Blocks compare by name and property set; property order is ignored
impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.properties.len() == other.properties.len()
            && self
                .properties
                .iter()
                .all(|(k, v)| other.property(k) == Some(v.as_str()))
    }
}

impl Eq for Block {}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.properties.is_empty() {
            f.write_str("<")?;
            for (i, (key, value)) in self.properties.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}={}", key, value)?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl FromStr for Block {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self> {
        let spec = s.trim();

        let Some((name, rest)) = spec.split_once('<') else {
            if spec.is_empty() {
                return Err(DecodeError::block(s, "empty block name"));
            }
            if spec.contains('>') {
                return Err(DecodeError::block(s, "'>' without opening '<'"));
            }
            return Block::new(spec);
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(DecodeError::block(s, "empty block name"));
        }

        let body = rest
            .strip_suffix('>')
            .ok_or_else(|| DecodeError::block(s, "unterminated property list"))?;
        if body.contains('<') || body.contains('>') {
            return Err(DecodeError::block(s, "unbalanced '<' '>' in property list"));
        }

        let mut block = Block::new(name)?;
        if body.trim().is_empty() {
            return Ok(block);
        }

        for pair in body.split(',') {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| DecodeError::block(s, format!("property '{}' has no value", pair.trim())))?;
            if value.contains('=') {
                return Err(DecodeError::block(
                    s,
                    format!("property '{}' has more than one '='", pair.trim()),
                ));
            }
            let key = key.trim();
            if key.is_empty() {
                return Err(DecodeError::block(s, "property with empty key"));
            }
            block.set_property(key, value.trim())?;
        }

        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_block_with_properties() {
        let block: Block = "block<key=value,key2=value2>".parse().unwrap();
        assert_eq!(block.name(), "block");
        let props: Vec<_> = block.properties().collect();
        assert_eq!(props, vec![("key", "value"), ("key2", "value2")]);
    }

    #[test]
    fn test_parse_plain_block() {
        let block: Block = "  grass ".parse().unwrap();
        assert_eq!(block.name(), "grass");
        assert!(!block.has_properties());
    }

    #[test]
    fn test_parse_tolerates_spacing() {
        let block: Block = "door < open = true , facing = north >".parse().unwrap();
        assert_eq!(block.name(), "door");
        assert_eq!(block.property("open"), Some("true"));
        assert_eq!(block.property("facing"), Some("north"));
    }

    #[test]
    fn test_parse_empty_property_list() {
        let block: Block = "stone<>".parse().unwrap();
        assert_eq!(block.name(), "stone");
        assert_eq!(block.property_count(), 0);
    }

    #[test]
    fn test_parse_duplicate_key_overwrites() {
        let block: Block = "b<k=1, j=2, k=3>".parse().unwrap();
        let props: Vec<_> = block.properties().collect();
        assert_eq!(props, vec![("k", "3"), ("j", "2")]);
    }

    #[test]
    fn test_parse_malformed_blocks() {
        let cases = [
            "",
            "block<key=value",
            "<key=value>",
            "block<key>",
            "block<key=value,key2>",
            "block<a=b=c>",
            "block<=value>",
            "block<k=v>extra",
            "block<k=<v>>",
            "block>",
        ];
        for case in cases {
            assert!(
                matches!(case.parse::<Block>(), Err(DecodeError::MalformedBlockSpec { .. })),
                "expected failure for {:?}",
                case
            );
        }
    }

    #[test]
    fn test_set_property_twice_keeps_position() {
        let mut block = Block::new("torch").unwrap();
        block.set_property("lit", "false").unwrap();
        block.set_property("facing", "east").unwrap();
        block.set_property("lit", "true").unwrap();

        let props: Vec<_> = block.properties().collect();
        assert_eq!(props, vec![("lit", "true"), ("facing", "east")]);
    }

    #[test]
    fn test_remove_property_compacts() {
        let mut block = Block::new("b").unwrap()
            .with_property("a", "1").unwrap()
            .with_property("b", "2").unwrap()
            .with_property("c", "3").unwrap();

        assert_eq!(block.remove_property("b"), Some("2".to_string()));
        assert_eq!(block.remove_property("missing"), None);
        let props: Vec<_> = block.properties().collect();
        assert_eq!(props, vec![("a", "1"), ("c", "3")]);
    }

    #[test]
    fn test_rejects_unwritable_names() {
        for name in ["", " grass", "grass\n", "a<b", "a>b", "a:b"] {
            assert!(
                matches!(Block::new(name), Err(DecodeError::MalformedBlockSpec { .. })),
                "expected failure for {:?}",
                name
            );
        }
        assert_eq!(Block::new("mossy stone").unwrap().name(), "mossy stone");
    }

    #[test]
    fn test_rejects_unwritable_properties() {
        let cases = [
            ("", "v"),
            (" k", "v"),
            ("k", " v"),
            ("k", "v "),
            ("k,j", "v"),
            ("k", "a,b"),
            ("k=j", "v"),
            ("k", "a=b"),
            ("k", "<v>"),
            ("k", "a:b"),
            ("k", "line\nbreak"),
        ];
        for (key, value) in cases {
            let mut block = Block::new("a").unwrap();
            assert!(
                matches!(block.set_property(key, value), Err(DecodeError::MalformedBlockSpec { .. })),
                "expected failure for {:?}={:?}",
                key,
                value
            );
            assert!(!block.has_properties());
        }

        let block = Block::new("a").unwrap().with_property("k", "").unwrap();
        assert_eq!(block.to_string().parse::<Block>().unwrap(), block);
    }

    #[test]
    fn test_deserialize_validates() {
        let block: Block = serde_json::from_str(r#"{"name":"door","properties":[["open","true"]]}"#).unwrap();
        assert_eq!(block.property("open"), Some("true"));
        assert!(serde_json::from_str::<Block>(r#"{"name":""}"#).is_err());
        assert!(serde_json::from_str::<Block>(r#"{"name":"a","properties":[["k"," v"]]}"#).is_err());
    }

    #[test]
    fn test_missing_property_is_none() {
        let block = Block::new("air").unwrap();
        assert_eq!(block.property("anything"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Block::new("grass").unwrap().to_string(), "grass");
        let block = Block::new("block").unwrap()
            .with_property("key", "value").unwrap()
            .with_property("key2", "value2").unwrap();
        assert_eq!(block.to_string(), "block<key=value, key2=value2>");
        assert_eq!(block.to_string().parse::<Block>().unwrap(), block);
    }

    #[test]
    fn test_equality_ignores_property_order() {
        let block = |props: &[(&str, &str)]| {
            props.iter().fold(Block::new("b").unwrap(), |block, (k, v)| {
                block.with_property(*k, *v).unwrap()
            })
        };
        let a = block(&[("x", "1"), ("y", "2")]);
        let b = block(&[("y", "2"), ("x", "1")]);
        let c = block(&[("x", "1")]);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let other = Block::new("other").unwrap();
        let other = other.with_property("x", "1").unwrap().with_property("y", "2").unwrap();
        assert_ne!(a, other);
    }
}
