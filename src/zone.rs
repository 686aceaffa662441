//! Zone catalog: named groups of document properties used for field-level
//! view/edit scoping.
//!
//! A collaboration references zones two ways: `zone` lists what the actor
//! may see and edit, `zone_hidden` marks properties that stay read-only.
//! Unknown zone ids degrade to warnings instead of failing resolution.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{ConfigWarning, WarningCode};

/// A named group of document property identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub properties: Vec<String>,
}

/// Per-actor field scope resolved from zone references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneScope {
    /// Properties the actor may view.
    pub visible: BTreeSet<String>,
    /// Properties the actor may edit (visible minus hidden).
    pub editable: BTreeSet<String>,
}

impl ZoneScope {
    /// Scope covering every property in the catalog, used when zone scoping
    /// is disabled for the workflow or `edit_all` is set.
    pub fn unrestricted(catalog: &ZoneCatalog) -> Self {
        let all: BTreeSet<String> = catalog
            .zones
            .values()
            .flat_map(|z| z.properties.iter().cloned())
            .collect();
        Self {
            visible: all.clone(),
            editable: all,
        }
    }
}

/// All zones of one workflow, keyed by zone id.
#[derive(Debug, Clone, Default)]
pub struct ZoneCatalog {
    zones: BTreeMap<String, Zone>,
}

impl ZoneCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, zone: Zone) {
        self.zones.insert(zone.id.clone(), zone);
    }

    pub fn get(&self, id: &str) -> Option<&Zone> {
        self.zones.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.zones.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Resolve zone references into a concrete property scope.
    ///
    /// Properties of `zone_ids` are visible and editable; properties of
    /// `hidden_ids` are removed from the editable set.  Dangling zone ids
    /// are skipped and reported as warnings.
    pub fn resolve_scope(
        &self,
        zone_ids: &[String],
        hidden_ids: &[String],
    ) -> (ZoneScope, Vec<ConfigWarning>) {
        let mut warnings = Vec::new();
        let mut visible = BTreeSet::new();
        let mut hidden = BTreeSet::new();

        for id in zone_ids {
            match self.zones.get(id) {
                Some(zone) => visible.extend(zone.properties.iter().cloned()),
                None => warnings.push(dangling(id)),
            }
        }
        for id in hidden_ids {
            match self.zones.get(id) {
                Some(zone) => hidden.extend(zone.properties.iter().cloned()),
                None => warnings.push(dangling(id)),
            }
        }

        let editable = visible.difference(&hidden).cloned().collect();
        (ZoneScope { visible, editable }, warnings)
    }
}

fn dangling(zone_id: &str) -> ConfigWarning {
    ConfigWarning::new(
        WarningCode::UnknownZone,
        format!("zone '{zone_id}' does not exist; reference skipped"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ZoneCatalog {
        let mut catalog = ZoneCatalog::new();
        catalog.insert(Zone {
            id: "z1".into(),
            name: "Header".into(),
            properties: vec!["amount".into(), "supplier".into()],
        });
        catalog.insert(Zone {
            id: "z2".into(),
            name: "Internal".into(),
            properties: vec!["margin".into()],
        });
        catalog.insert(Zone {
            id: "z3".into(),
            name: "HR".into(),
            properties: vec!["salary".into()],
        });
        catalog
    }

    #[test]
    fn test_resolve_scope_visible_and_editable() {
        let catalog = catalog();
        let (scope, warnings) = catalog.resolve_scope(&["z1".into()], &[]);
        assert!(warnings.is_empty());
        assert!(scope.visible.contains("amount"));
        assert!(scope.visible.contains("supplier"));
        assert!(scope.editable.contains("amount"));
        // z3 not referenced at all: none of its properties appear
        assert!(!scope.visible.contains("salary"));
        assert!(!scope.editable.contains("salary"));
    }

    #[test]
    fn test_hidden_zone_removes_edit_access() {
        let catalog = catalog();
        let (scope, _) = catalog.resolve_scope(&["z1".into(), "z2".into()], &["z2".into()]);
        assert!(scope.visible.contains("margin"));
        assert!(!scope.editable.contains("margin"));
        assert!(scope.editable.contains("amount"));
    }

    #[test]
    fn test_dangling_zone_reference_warns() {
        let catalog = catalog();
        let (scope, warnings) = catalog.resolve_scope(&["z1".into(), "z9".into()], &[]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, WarningCode::UnknownZone);
        // the valid zone still resolved
        assert!(scope.visible.contains("amount"));
    }

    #[test]
    fn test_unrestricted_scope_covers_catalog() {
        let catalog = catalog();
        let scope = ZoneScope::unrestricted(&catalog);
        for prop in ["amount", "supplier", "margin", "salary"] {
            assert!(scope.visible.contains(prop));
            assert!(scope.editable.contains(prop));
        }
    }

    #[test]
    fn test_empty_references_empty_scope() {
        let catalog = catalog();
        let (scope, warnings) = catalog.resolve_scope(&[], &[]);
        assert!(warnings.is_empty());
        assert!(scope.visible.is_empty());
        assert!(scope.editable.is_empty());
    }
}
