use crate::domain::model::{ContentNamespace, ItemType};
use crate::utils::error::{PcaError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;

const CM_URI_PATTERN: &str =
    r"^(?P<namespace>[a-zA-Z]+):(?P<pub_id>\d+)-(?P<item_id>\d+)(?:-(?P<item_type>\d+))?(?:-v(?P<version>\d+))?$";

/// Content Manager URI，例如 `tcm:5-123-64` 或 `ish:39137-1-16-v2`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CmUri {
    namespace: ContentNamespace,
    publication_id: i32,
    item_id: i32,
    item_type: ItemType,
    version: Option<i32>,
}

impl CmUri {
    pub fn new(namespace: ContentNamespace, publication_id: i32, item_id: i32, item_type: ItemType) -> Self {
        Self {
            namespace,
            publication_id,
            item_id,
            item_type,
            version: None,
        }
    }

    pub fn with_version(mut self, version: i32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn parse(uri: &str) -> Result<Self> {
        let re = Regex::new(CM_URI_PATTERN)?;
        let caps = re.captures(uri).ok_or_else(|| invalid(uri, "does not match ns:pub-item[-type][-vN]"))?;

        let prefix = &caps["namespace"];
        let namespace = ContentNamespace::from_prefix(prefix)
            .ok_or_else(|| invalid(uri, &format!("unknown namespace '{}'", prefix)))?;
        let publication_id = parse_number(uri, &caps["pub_id"])?;
        let item_id = parse_number(uri, &caps["item_id"])?;

        let item_type = match caps.name("item_type") {
            Some(m) => {
                let id = parse_number(uri, m.as_str())?;
                ItemType::from_id(id as i64)
                    .ok_or_else(|| invalid(uri, &format!("unknown item type {}", id)))?
            }
            None => ItemType::Component,
        };

        let version = match caps.name("version") {
            Some(m) => Some(parse_number(uri, m.as_str())?),
            None => None,
        };

        Ok(Self {
            namespace,
            publication_id,
            item_id,
            item_type,
            version,
        })
    }

    pub fn namespace(&self) -> ContentNamespace {
        self.namespace
    }

    pub fn namespace_id(&self) -> i32 {
        self.namespace.id()
    }

    pub fn publication_id(&self) -> i32 {
        self.publication_id
    }

    pub fn item_id(&self) -> i32 {
        self.item_id
    }

    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    pub fn version(&self) -> Option<i32> {
        self.version
    }
}

fn invalid(uri: &str, reason: &str) -> PcaError {
    PcaError::InvalidCmUri {
        uri: uri.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number(uri: &str, digits: &str) -> Result<i32> {
    digits
        .parse::<i32>()
        .map_err(|e| invalid(uri, &format!("'{}' is not a valid id: {}", digits, e)))
}

impl fmt::Display for CmUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}-{}",
            self.namespace.prefix(),
            self.publication_id,
            self.item_id,
            self.item_type.id()
        )?;
        if let Some(version) = self.version {
            write!(f, "-v{}", version)?;
        }
        Ok(())
    }
}

impl FromStr for CmUri {
    type Err = PcaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_uri() {
        let uri = CmUri::parse("tcm:5-123-64-v3").unwrap();
        assert_eq!(uri.namespace(), ContentNamespace::Sites);
        assert_eq!(uri.namespace_id(), 1);
        assert_eq!(uri.publication_id(), 5);
        assert_eq!(uri.item_id(), 123);
        assert_eq!(uri.item_type(), ItemType::Page);
        assert_eq!(uri.version(), Some(3));
        assert_eq!(uri.to_string(), "tcm:5-123-64-v3");
    }

    #[test]
    fn test_item_type_defaults_to_component() {
        let uri: CmUri = "ish:39137-1".parse().unwrap();
        assert_eq!(uri.namespace_id(), 2);
        assert_eq!(uri.item_type(), ItemType::Component);
        assert_eq!(uri.version(), None);
        assert_eq!(uri.to_string(), "ish:39137-1-16");
    }

    #[test]
    fn test_equality_ignores_implicit_item_type_spelling() {
        assert_eq!(
            CmUri::parse("tcm:1-2").unwrap(),
            CmUri::parse("tcm:1-2-16").unwrap()
        );
        assert_ne!(
            CmUri::parse("tcm:1-2-16").unwrap(),
            CmUri::parse("tcm:1-2-16-v1").unwrap()
        );
    }

    #[test]
    fn test_invalid_uris() {
        for bad in ["", "tcm:", "tcm:1", "abc:1-2", "tcm:1-2-3", "tcm:a-b", "tcm:1-2-16-x"] {
            let err = CmUri::parse(bad).unwrap_err();
            assert!(
                matches!(err, PcaError::InvalidCmUri { .. }),
                "expected InvalidCmUri for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_builder_constructor() {
        let uri = CmUri::new(ContentNamespace::Sites, 8, 400, ItemType::Keyword).with_version(1);
        assert_eq!(uri.to_string(), "tcm:8-400-1024-v1");
    }
}
