//! Set names for statements built without an explicit name, and for areas.

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHasher;

use crate::ast::Identifier;

static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Process-wide source of unique identifiers.
///
/// Names look like `_s42`. The counter is atomic, so statements built on
/// different threads never share a name.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameGenerator;

impl NameGenerator {
    pub fn next() -> Identifier {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Identifier::new_unchecked(format!("_s{}", n))
    }

    /// Name of an area, derived from its printed forms.
    ///
    /// Equal areas always get the same name (`_a` plus 16 hex digits), so
    /// leaves built separately over one box share a single area line.
    pub fn for_area(key: &str) -> Identifier {
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        Identifier::new_unchecked(format!("_a{:016x}", hasher.finish()))
    }
}
