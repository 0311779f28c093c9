//! Catalog loading and lookup.
//!
//! Catalogs are loaded from a JSON document with three sections:
//! `attributes` (definitions), `effects` (named rules), and `items`
//! (types referencing effects by name). Effect handlers are resolved once
//! here through a [`HandlerRegistry`]; the calculation core never looks a
//! handler up by name again.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::effects::{HandlerRegistry, ModifierInfo};
use crate::error::{Error, Result};

use super::effect::{Effect, EffectType, RunTime};
use super::item::{AttributeDef, AttributeDefs, Item, ItemId};

/// Lookup interface the engine uses to resolve stored item IDs.
pub trait ItemSource {
    fn get_item(&self, id: ItemId) -> Option<Arc<Item>>;
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    attributes: Vec<AttributeDef>,
    #[serde(default)]
    effects: Vec<EffectRecord>,
    items: Vec<ItemRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EffectRecord {
    name: String,
    #[serde(default)]
    run_time: RunTime,
    #[serde(default)]
    types: BTreeSet<EffectType>,
    #[serde(default = "default_true")]
    active_by_default: bool,
    #[serde(default)]
    resistance_attribute: Option<String>,
    #[serde(default)]
    modifiers: Vec<ModifierInfo>,
}

#[derive(Debug, Deserialize)]
struct ItemRecord {
    id: ItemId,
    name: String,
    group: String,
    category: String,
    #[serde(default)]
    attributes: BTreeMap<String, f64>,
    #[serde(default)]
    effects: Vec<String>,
}

fn default_true() -> bool {
    true
}

/// Immutable collection of items, effects, and attribute definitions.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: HashMap<ItemId, Arc<Item>>,
    effects: HashMap<String, Arc<Effect>>,
    defs: Arc<AttributeDefs>,
    source: Option<PathBuf>,
}

impl Catalog {
    /// Load a catalog from a JSON file using the built-in handler registry.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let mut catalog = Self::from_reader(file)?;
        catalog.source = Some(path.to_path_buf());
        Ok(catalog)
    }

    /// Load a catalog from a reader using the built-in handler registry.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with(reader, &HandlerRegistry::builtin())
    }

    /// Load a catalog, resolving effect handlers through `registry`.
    pub fn from_reader_with<R: Read>(reader: R, registry: &HandlerRegistry) -> Result<Self> {
        let file: CatalogFile = serde_json::from_reader(reader)?;

        let mut defs = AttributeDefs::new();
        for def in file.attributes {
            if let (Some(min), Some(max)) = (def.min, def.max) {
                if min > max {
                    return Err(Error::CatalogValidation {
                        message: format!("attribute {} has min {min} above max {max}", def.name),
                    });
                }
            }
            if defs.contains_key(&def.name) {
                return Err(Error::CatalogValidation {
                    message: format!("duplicate attribute definition: {}", def.name),
                });
            }
            defs.insert(def.name.clone(), def);
        }
        let defs = Arc::new(defs);

        let mut effects = HashMap::new();
        for record in file.effects {
            if effects.contains_key(&record.name) {
                return Err(Error::CatalogValidation {
                    message: format!("duplicate effect name: {}", record.name),
                });
            }
            let handler = registry.resolve(&record.name, record.modifiers);
            debug!(effect = %record.name, handler = handler.label(), "resolved effect handler");
            let effect = Effect {
                name: record.name.clone(),
                run_time: record.run_time,
                types: record.types,
                active_by_default: record.active_by_default,
                resistance_attribute: record.resistance_attribute,
                handler,
            };
            effects.insert(record.name, Arc::new(effect));
        }

        let mut items = HashMap::new();
        for record in file.items {
            if items.contains_key(&record.id) {
                return Err(Error::CatalogValidation {
                    message: format!("duplicate item id: {}", record.id),
                });
            }
            if record.name.trim().is_empty() {
                return Err(Error::CatalogValidation {
                    message: format!("item {} has an empty name", record.id),
                });
            }
            if let Some((name, value)) = record
                .attributes
                .iter()
                .find(|(_, value)| !value.is_finite())
            {
                return Err(Error::CatalogValidation {
                    message: format!("item {} attribute {name} is not finite: {value}", record.id),
                });
            }

            let mut item = Item::new(
                record.id,
                record.name.trim(),
                record.group,
                record.category,
            )
            .with_defs(Arc::clone(&defs));
            for (name, value) in record.attributes {
                item = item.with_attribute(name, value);
            }
            for effect_name in record.effects {
                let effect = effects
                    .get(&effect_name)
                    .ok_or_else(|| Error::UnknownEffect {
                        item_id: record.id,
                        effect: effect_name.clone(),
                    })?;
                item = item.with_effect(Arc::clone(effect));
            }
            items.insert(record.id, Arc::new(item));
        }

        debug!(
            items = items.len(),
            effects = effects.len(),
            "catalog loaded"
        );

        Ok(Self {
            items,
            effects,
            defs,
            source: None,
        })
    }

    /// Resolve an item or fail with [`Error::UnknownItem`].
    pub fn item(&self, id: ItemId) -> Result<Arc<Item>> {
        self.get_item(id).ok_or(Error::UnknownItem { item_id: id })
    }

    pub fn effect(&self, name: &str) -> Option<&Arc<Effect>> {
        self.effects.get(name)
    }

    pub fn attribute_def(&self, name: &str) -> Option<&AttributeDef> {
        self.defs.get(name)
    }

    /// Case-insensitive lookup by item name. The lowest ID wins when several
    /// items share a name.
    pub fn find_by_name(&self, name: &str) -> Option<Arc<Item>> {
        let needle = name.trim().to_lowercase();
        self.items_sorted()
            .into_iter()
            .find(|item| item.name.to_lowercase() == needle)
            .cloned()
    }

    /// All items sorted by ID.
    pub fn items_sorted(&self) -> Vec<&Arc<Item>> {
        let mut items: Vec<&Arc<Item>> = self.items.values().collect();
        items.sort_by_key(|item| item.id);
        items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the source path if the catalog was loaded from a file.
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl ItemSource for Catalog {
    fn get_item(&self, id: ItemId) -> Option<Arc<Item>> {
        self.items.get(&id).cloned()
    }
}
