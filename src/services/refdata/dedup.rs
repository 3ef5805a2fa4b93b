//! Reference-entity deduplication. Catalogs accumulate near-duplicate
//! brands and categories ("Fonzie", "FONZIE", " fonzie ") through years of
//! manual entry; this collapses them onto the first-seen spelling so
//! pickers and defaults work with one entry per real-world entity.

use std::collections::HashMap;

use serde::Serialize;

use crate::catalog::models::RefEntity;
use crate::services::reconcile::normalizer;

/// Result of [`canonicalize_refs`]: every input id mapped to its canonical
/// name, plus one representative entity per distinct name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRefs {
    /// Every input id, mapped to the canonical spelling of its name.
    pub by_id: HashMap<i64, String>,
    /// One entity per distinct normalized name, in first-seen order.
    pub unique: Vec<RefEntity>,
}

impl CanonicalRefs {
    pub fn canonical_name(&self, id: i64) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    /// Look up the representative entity for a name, under the same
    /// normalization the dedup key uses.
    pub fn find(&self, name: &str) -> Option<&RefEntity> {
        let key = normalizer::normalize(name);
        self.unique
            .iter()
            .find(|entity| normalizer::normalize(&entity.name) == key)
    }
}

/// Collapse entities whose names differ only by case or surrounding
/// whitespace. The first occurrence of a name is canonical; later
/// occurrences map onto it. Accented spellings stay distinct on purpose:
/// "Bébé" and "Bebe" may be different brands.
pub fn canonicalize_refs(entities: &[RefEntity]) -> CanonicalRefs {
    let mut by_id = HashMap::with_capacity(entities.len());
    let mut unique: Vec<RefEntity> = Vec::new();
    let mut first_by_key: HashMap<String, usize> = HashMap::new();

    for entity in entities {
        let key = normalizer::normalize(&entity.name);
        let index = match first_by_key.get(&key) {
            Some(&index) => index,
            None => {
                first_by_key.insert(key, unique.len());
                unique.push(entity.clone());
                unique.len() - 1
            }
        };
        by_id.insert(entity.id, unique[index].name.clone());
    }

    CanonicalRefs { by_id, unique }
}
