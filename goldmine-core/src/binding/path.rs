//! Dotted binding paths of the form `<root>.<field>`.

use std::fmt;
use std::str::FromStr;

use super::BindingError;

/// A parsed `<root>.<field>` path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingPath {
    root: String,
    field: String,
}

impl BindingPath {
    /// Build a path from its two segments, validating each.
    pub fn new(root: &str, field: &str) -> Result<Self, BindingError> {
        validate_name(root)?;
        validate_name(field)?;
        Ok(Self {
            root: root.to_string(),
            field: field.to_string(),
        })
    }

    /// Parse `"<root>.<field>"`.
    pub fn parse(path: &str) -> Result<Self, BindingError> {
        let malformed = || BindingError::MalformedPath {
            path: path.to_string(),
        };

        let mut segments = path.split('.');
        let (Some(root), Some(field), None) = (segments.next(), segments.next(), segments.next())
        else {
            return Err(malformed());
        };
        if !is_valid_name(root) || !is_valid_name(field) {
            return Err(malformed());
        }

        Ok(Self {
            root: root.to_string(),
            field: field.to_string(),
        })
    }

    /// The registered root key.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The exposed field name.
    pub fn field(&self) -> &str {
        &self.field
    }
}

impl FromStr for BindingPath {
    type Err = BindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for BindingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.root, self.field)
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Check that a root key or field name can appear in a path.
pub(crate) fn validate_name(name: &str) -> Result<(), BindingError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(BindingError::InvalidName {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_segments() {
        let path: BindingPath = "game.gold".parse().unwrap();
        assert_eq!(path.root(), "game");
        assert_eq!(path.field(), "gold");
        assert_eq!(path.to_string(), "game.gold");
    }

    #[test]
    fn rejects_wrong_shape() {
        for bad in ["gold", "game.gold.amount", ".gold", "game.", "", "game. gold", "a..b"] {
            assert!(
                matches!(BindingPath::parse(bad), Err(BindingError::MalformedPath { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn new_validates_segments() {
        assert!(BindingPath::new("achievements", "total_unlocked").is_ok());
        assert!(matches!(
            BindingPath::new("game", "a.b"),
            Err(BindingError::InvalidName { .. })
        ));
    }
}
