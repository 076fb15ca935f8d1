//! Material repository
//!
//! The whole collection is stored as one JSON array under a single key.

use super::database::Database;
use super::model::{MaterialPatch, NewMaterial, RevisionMaterial};
use super::MaterialResult;
use tracing::{debug, warn};

/// Key under which the collection is stored
pub const STORAGE_KEY: &str = "revision-materials";

pub struct MaterialRepository {
    db: Database,
}

impl MaterialRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// All materials in creation order. Unreadable data yields an empty list.
    pub fn get_all(&self) -> MaterialResult<Vec<RevisionMaterial>> {
        let Some(stored) = self.db.get(STORAGE_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&stored) {
            Ok(materials) => Ok(materials),
            Err(e) => {
                warn!("Error loading revision materials: {}", e);
                Ok(Vec::new())
            }
        }
    }

    pub fn get_by_id(&self, id: &str) -> MaterialResult<Option<RevisionMaterial>> {
        Ok(self.get_all()?.into_iter().find(|material| material.id == id))
    }

    pub fn create(&self, data: &NewMaterial) -> MaterialResult<RevisionMaterial> {
        let mut materials = self.get_all()?;
        let material = RevisionMaterial::create(data);
        materials.push(material.clone());
        self.save_all(&materials)?;
        debug!(id = %material.id, "Created material");
        Ok(material)
    }

    /// Apply a partial update; `None` if no material has this id
    pub fn update(&self, id: &str, patch: &MaterialPatch) -> MaterialResult<Option<RevisionMaterial>> {
        let mut materials = self.get_all()?;
        let Some(material) = materials.iter_mut().find(|material| material.id == id) else {
            return Ok(None);
        };
        material.apply(patch);
        let updated = material.clone();
        self.save_all(&materials)?;
        debug!(id = %id, "Updated material");
        Ok(Some(updated))
    }

    /// Delete by id; returns whether a material was removed
    pub fn delete(&self, id: &str) -> MaterialResult<bool> {
        let materials = self.get_all()?;
        let remaining: Vec<_> = materials
            .iter()
            .filter(|material| material.id != id)
            .cloned()
            .collect();
        if remaining.len() == materials.len() {
            return Ok(false);
        }
        self.save_all(&remaining)?;
        debug!(id = %id, "Deleted material");
        Ok(true)
    }

    /// Case-insensitive search over names and extracts; blank returns everything
    pub fn search(&self, query: &str) -> MaterialResult<Vec<RevisionMaterial>> {
        let materials = self.get_all()?;
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Ok(materials);
        }
        Ok(materials
            .into_iter()
            .filter(|material| material.matches(&query))
            .collect())
    }

    pub fn clear_all(&self) -> MaterialResult<()> {
        self.db.remove(STORAGE_KEY)?;
        Ok(())
    }

    pub fn count(&self) -> MaterialResult<usize> {
        Ok(self.get_all()?.len())
    }

    fn save_all(&self, materials: &[RevisionMaterial]) -> MaterialResult<()> {
        let encoded = serde_json::to_string(materials)?;
        self.db.set(STORAGE_KEY, &encoded)
    }
}
