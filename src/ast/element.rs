use serde::Serialize;

/// OSM element kind selected by a query clause.
///
/// Relations are accepted as a kind but nothing beyond plain selection is
/// offered for them; recurse down to ways or nodes to work with their members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// `node`
    Node,
    /// `way`
    Way,
    /// `rel`
    Relation,
    /// `nwr` (nodes, ways and relations at once)
    NodeWayRelation,
}

impl ElementKind {
    /// Keyword used by the query interpreter
    pub fn keyword(self) -> &'static str {
        match self {
            ElementKind::Node => "node",
            ElementKind::Way => "way",
            ElementKind::Relation => "rel",
            ElementKind::NodeWayRelation => "nwr",
        }
    }

    /// Parse a keyword, accepting the long forms as well
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "node" | "n" => Some(Self::Node),
            "way" | "w" => Some(Self::Way),
            "rel" | "relation" | "r" => Some(Self::Relation),
            "nwr" => Some(Self::NodeWayRelation),
            _ => None,
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}
