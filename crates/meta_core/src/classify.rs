use crate::{GenerRole, Generator};
use serde::{Deserialize, Serialize};

/// Decides which role a generator plays in a station group.
pub trait RoleClassifier: Send + Sync {
    fn classify(&self, gener: &Generator) -> GenerRole;
}

impl<F> RoleClassifier for F
where
    F: Fn(&Generator) -> GenerRole + Send + Sync,
{
    fn classify(&self, gener: &Generator) -> GenerRole {
        self(gener)
    }
}

/// Matches a name prefix together with a type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTag {
    pub name_prefix: String,
    pub gener_type: String,
}

impl RoleTag {
    pub fn new(name_prefix: &str, gener_type: &str) -> Self {
        Self {
            name_prefix: name_prefix.to_string(),
            gener_type: gener_type.to_string(),
        }
    }

    /// Type tags are fixed-width in input files; trailing blanks don't count.
    pub fn matches(&self, gener: &Generator) -> bool {
        gener.name.starts_with(&self.name_prefix)
            && gener.gener_type.trim_end() == self.gener_type.trim_end()
    }
}

/// Classifies by name prefix and type tag. Control is checked before check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagClassifier {
    pub control: RoleTag,
    pub check: RoleTag,
}

impl Default for TagClassifier {
    fn default() -> Self {
        Self {
            control: RoleTag::new("tmk", "TMAK"),
            check: RoleTag::new("chk", "FINJ"),
        }
    }
}

impl RoleClassifier for TagClassifier {
    fn classify(&self, gener: &Generator) -> GenerRole {
        if self.control.matches(gener) {
            GenerRole::Control
        } else if self.check.matches(gener) {
            GenerRole::Check
        } else {
            GenerRole::Other
        }
    }
}
