//! Per-stack-type expected-layer templates.
//!
//! A template is an ordered list of expected box counts, index 0 being
//! the topmost physical layer. Stores load from JSON of the form
//! `{"1": [10, 10, 10], "2": [8, 8]}` keyed by pile type id.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::counting::Layer;

/// Template store failure.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template configuration")]
    Io(#[from] std::io::Error),
    #[error("failed to parse template configuration")]
    Parse(#[from] serde_json::Error),
}

/// Lookup of expected layer templates by pile type id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateStore {
    templates: HashMap<u32, Vec<u32>>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        Ok(Self::from_json(&fs::read_to_string(path)?)?)
    }

    /// Parse a store from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Template for a pile type, if configured.
    pub fn get(&self, pile_id: u32) -> Option<&[u32]> {
        self.templates.get(&pile_id).map(Vec::as_slice)
    }

    pub fn insert(&mut self, pile_id: u32, template: Vec<u32>) {
        self.templates.insert(pile_id, template);
    }

    /// Template for a pile type, or one synthesized from the observed
    /// layers when nothing is configured.
    pub fn get_or_fallback(&self, pile_id: u32, layers: &[Layer]) -> Vec<u32> {
        match self.get(pile_id) {
            Some(template) => template.to_vec(),
            None => {
                warn!(pile_id, "no template configured, using observed layer counts");
                fallback_template(layers)
            }
        }
    }
}

/// Fallback template built from what was actually observed: one entry
/// per detected layer, each the layer's box count. Leaves the count
/// policy trusting the detections when no configuration exists.
pub fn fallback_template(layers: &[Layer]) -> Vec<u32> {
    layers.iter().map(|l| l.boxes.len() as u32).collect()
}
