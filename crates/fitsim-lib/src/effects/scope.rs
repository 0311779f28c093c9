use crate::attributes::AttributeStore;
use crate::error::{Error, Result};
use crate::fit::{Fit, HolderRef};

use super::ModifierDomain;

/// Read-only view a handler gets of the fit and the holder it runs for.
#[derive(Debug, Clone, Copy)]
pub struct EffectScope<'a> {
    fit: &'a Fit,
    source: HolderRef,
}

impl<'a> EffectScope<'a> {
    pub fn new(fit: &'a Fit, source: HolderRef) -> Self {
        Self { fit, source }
    }

    pub fn fit(&self) -> &'a Fit {
        self.fit
    }

    pub fn source(&self) -> HolderRef {
        self.source
    }

    pub fn source_store(&self) -> Result<&'a AttributeStore> {
        self.fit
            .store(self.source)
            .ok_or(Error::UnknownHolder {
                holder: self.source,
            })
    }

    /// Current modified value of an attribute on the source holder.
    pub fn source_attribute(&self, name: &str) -> Option<f64> {
        self.fit.store(self.source).and_then(|store| store.get(name))
    }

    /// Like [`Self::source_attribute`], failing with [`Error::MissingAttribute`].
    pub fn require_source_attribute(&self, name: &str) -> Result<f64> {
        let store = self.source_store()?;
        store.get(name).ok_or_else(|| Error::MissingAttribute {
            item_id: store.item().id,
            attribute: name.to_string(),
        })
    }

    /// Holders a modifier in `domain` lands on.
    pub fn targets(&self, domain: ModifierDomain, filter_group: Option<&str>) -> Vec<HolderRef> {
        match (domain, filter_group) {
            (ModifierDomain::Itself, _) => vec![self.source],
            (ModifierDomain::Ship | ModifierDomain::Target, Some(group)) => {
                self.fit.module_refs_in_group(group)
            }
            (ModifierDomain::Ship | ModifierDomain::Target, None) => vec![HolderRef::Ship],
            (ModifierDomain::Container, _) => match self.source {
                HolderRef::Charge(index) => vec![HolderRef::Module(index)],
                HolderRef::Module(index) if self.fit.store(HolderRef::Charge(index)).is_some() => {
                    vec![HolderRef::Charge(index)]
                }
                _ => Vec::new(),
            },
        }
    }
}
