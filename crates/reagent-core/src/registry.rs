//! Reagent prototypes and their metabolism effects.
//!
//! The registry is built once (from code or JSON prototype definitions),
//! then shared read-only behind an `Arc`. Lookups never fail loudly: an
//! unknown reagent id simply has no prototype.

use std::collections::HashMap;
use std::fmt;

use hecs::Entity;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use reagent_logic::ReagentUnit;

/// One metabolism rule for a reagent.
///
/// Returns how many units of `reagent_id` to remove from the owner's liver
/// for `elapsed` seconds of metabolism.
pub trait Metabolizable: Send + Sync {
    fn metabolize(&self, owner: Entity, reagent_id: &str, elapsed: f32) -> ReagentUnit;
}

impl<F> Metabolizable for F
where
    F: Fn(Entity, &str, f32) -> ReagentUnit + Send + Sync,
{
    fn metabolize(&self, owner: Entity, reagent_id: &str, elapsed: f32) -> ReagentUnit {
        self(owner, reagent_id, elapsed)
    }
}

/// Removes `round(rate * elapsed)` units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRateMetabolism {
    /// Units per second
    pub rate: f32,
}

impl Metabolizable for FixedRateMetabolism {
    fn metabolize(&self, _owner: Entity, _reagent_id: &str, elapsed: f32) -> ReagentUnit {
        (self.rate * elapsed).round().max(0.0) as ReagentUnit
    }
}

/// Removes the same amount every pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantMetabolism {
    pub amount: ReagentUnit,
}

impl Metabolizable for ConstantMetabolism {
    fn metabolize(&self, _owner: Entity, _reagent_id: &str, _elapsed: f32) -> ReagentUnit {
        self.amount
    }
}

/// Data-driven metabolism effect, as written in prototype JSON
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MetabolismDef {
    FixedRate { rate: f32 },
    Constant { amount: ReagentUnit },
}

impl MetabolismDef {
    fn into_effect(self) -> Box<dyn Metabolizable> {
        match self {
            MetabolismDef::FixedRate { rate } => Box::new(FixedRateMetabolism { rate }),
            MetabolismDef::Constant { amount } => Box::new(ConstantMetabolism { amount }),
        }
    }
}

/// Reagent prototype as written in JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReagentPrototypeDef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub metabolism: Vec<MetabolismDef>,
}

/// A registered reagent and its ordered metabolism effects
pub struct ReagentPrototype {
    pub id: String,
    pub name: String,
    metabolism: Vec<Box<dyn Metabolizable>>,
}

impl ReagentPrototype {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            metabolism: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_effect(mut self, effect: impl Metabolizable + 'static) -> Self {
        self.metabolism.push(Box::new(effect));
        self
    }

    /// Effects in the order they run
    pub fn metabolism(&self) -> &[Box<dyn Metabolizable>] {
        &self.metabolism
    }
}

impl From<ReagentPrototypeDef> for ReagentPrototype {
    fn from(def: ReagentPrototypeDef) -> Self {
        Self {
            name: def.name.unwrap_or_else(|| def.id.clone()),
            id: def.id,
            metabolism: def.metabolism.into_iter().map(MetabolismDef::into_effect).collect(),
        }
    }
}

impl fmt::Debug for ReagentPrototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReagentPrototype")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("effects", &self.metabolism.len())
            .finish()
    }
}

/// Immutable reagent id → prototype table
#[derive(Debug, Default)]
pub struct ReagentRegistry {
    prototypes: HashMap<String, ReagentPrototype>,
}

impl ReagentRegistry {
    pub fn builder() -> ReagentRegistryBuilder {
        ReagentRegistryBuilder::default()
    }

    /// Parse a JSON array of prototype definitions
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let defs: Vec<ReagentPrototypeDef> = serde_json::from_str(json)?;
        defs.into_iter()
            .fold(Self::builder(), |builder, def| builder.prototype(def.into()))
            .build()
    }

    pub fn lookup(&self, reagent_id: &str) -> Option<&ReagentPrototype> {
        self.prototypes.get(reagent_id)
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }
}

/// Collects prototypes, then freezes them into a `ReagentRegistry`
#[derive(Default)]
pub struct ReagentRegistryBuilder {
    prototypes: Vec<ReagentPrototype>,
}

impl ReagentRegistryBuilder {
    pub fn prototype(mut self, prototype: ReagentPrototype) -> Self {
        self.prototypes.push(prototype);
        self
    }

    /// Shorthand for a prototype with one effect
    pub fn reagent(self, id: impl Into<String>, effect: impl Metabolizable + 'static) -> Self {
        self.prototype(ReagentPrototype::new(id).with_effect(effect))
    }

    pub fn build(self) -> Result<ReagentRegistry, ConfigError> {
        let mut prototypes = HashMap::with_capacity(self.prototypes.len());
        for prototype in self.prototypes {
            if prototypes.contains_key(&prototype.id) {
                return Err(ConfigError::DuplicatePrototype(prototype.id));
            }
            prototypes.insert(prototype.id.clone(), prototype);
        }
        log::debug!("Reagent registry built with {} prototypes", prototypes.len());
        Ok(ReagentRegistry { prototypes })
    }
}
