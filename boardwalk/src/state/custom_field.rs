//! Custom field store: field name -> ordered option map.

use std::sync::Arc;

use indexmap::IndexMap;

use super::ci_cmp;
use crate::raw::RawCustomFieldOption;

/// One selectable custom field option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomFieldValue {
    pub key: String,
    pub value: String,
}

/// Two-level map: field name -> (option key -> option), each inner map
/// sorted case-insensitively by display value. Field order follows the
/// snapshot; inner maps re-sort on every merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomFieldState {
    pub fields: IndexMap<String, IndexMap<String, Arc<CustomFieldValue>>>,
}

impl CustomFieldState {
    pub fn from_raw(raw: &IndexMap<String, Vec<RawCustomFieldOption>>) -> Arc<Self> {
        let fields = raw
            .iter()
            .map(|(field, options)| {
                let mut map: IndexMap<String, Arc<CustomFieldValue>> = options
                    .iter()
                    .map(|option| {
                        (
                            option.key.clone(),
                            Arc::new(CustomFieldValue {
                                key: option.key.clone(),
                                value: option.value.clone(),
                            }),
                        )
                    })
                    .collect();
                sort_options(&mut map);
                (field.clone(), map)
            })
            .collect();
        Arc::new(Self { fields })
    }

    /// Merge new options into their fields. Unknown field names create new
    /// fields; no net change returns the same `Arc`.
    pub fn with_added(
        self: &Arc<Self>,
        raw: Option<&IndexMap<String, Vec<RawCustomFieldOption>>>,
    ) -> Arc<Self> {
        let raw = match raw {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Arc::clone(self),
        };

        let mut fields = self.fields.clone();
        let mut changed = false;
        for (field, options) in raw {
            let map = fields.entry(field.clone()).or_default();
            let mut field_changed = false;
            for option in options {
                let value = CustomFieldValue {
                    key: option.key.clone(),
                    value: option.value.clone(),
                };
                match map.get(&option.key) {
                    Some(existing) if **existing == value => {}
                    _ => {
                        map.insert(option.key.clone(), Arc::new(value));
                        field_changed = true;
                    }
                }
            }
            if field_changed {
                sort_options(map);
                changed = true;
            }
        }
        if !changed {
            return Arc::clone(self);
        }
        Arc::new(Self { fields })
    }

    /// The option of `field` at the given position in display order.
    pub fn by_index(&self, field: &str, index: usize) -> Option<&Arc<CustomFieldValue>> {
        self.fields
            .get(field)
            .and_then(|options| options.get_index(index))
            .map(|(_, v)| v)
    }

    /// The option of `field` with the given key.
    pub fn by_key(&self, field: &str, key: &str) -> Option<&Arc<CustomFieldValue>> {
        self.fields.get(field).and_then(|options| options.get(key))
    }
}

fn sort_options(options: &mut IndexMap<String, Arc<CustomFieldValue>>) {
    options.sort_by(|_, a, _, b| ci_cmp(&a.value, &b.value));
}
