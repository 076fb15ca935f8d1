use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named piece of study text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionMaterial {
    pub id: String,
    pub name: String,
    pub extract: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RevisionMaterial {
    /// Build a new material from form data, trimming both fields
    pub fn create(data: &NewMaterial) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: data.name.trim().to_string(),
            extract: data.extract.trim().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update and bump `updated_at`
    pub fn apply(&mut self, patch: &MaterialPatch) {
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(extract) = &patch.extract {
            self.extract = extract.trim().to_string();
        }
        self.updated_at = Utc::now();
    }

    /// Case-insensitive match on name or extract; `query` must already be lowercase
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query) || self.extract.to_lowercase().contains(query)
    }

    pub fn word_count(&self) -> usize {
        self.extract.split_whitespace().count()
    }
}

/// Data collected by the add/edit form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMaterial {
    pub name: String,
    pub extract: String,
}

/// Partial update of a material
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialPatch {
    pub name: Option<String>,
    pub extract: Option<String>,
}

impl From<NewMaterial> for MaterialPatch {
    fn from(data: NewMaterial) -> Self {
        Self {
            name: Some(data.name),
            extract: Some(data.extract),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_trims_fields() {
        let material = RevisionMaterial::create(&NewMaterial {
            name: "  Biology  ".into(),
            extract: "\nCells divide by mitosis.\n".into(),
        });
        assert_eq!(material.name, "Biology");
        assert_eq!(material.extract, "Cells divide by mitosis.");
        assert_eq!(material.created_at, material.updated_at);
        assert_eq!(material.word_count(), 4);
    }

    #[test]
    fn test_partial_patch_keeps_other_field() {
        let mut material = RevisionMaterial::create(&NewMaterial {
            name: "History".into(),
            extract: "The treaty was signed in 1648.".into(),
        });
        material.apply(&MaterialPatch {
            name: Some(" Modern History ".into()),
            extract: None,
        });
        assert_eq!(material.name, "Modern History");
        assert_eq!(material.extract, "The treaty was signed in 1648.");
        assert!(material.updated_at >= material.created_at);
    }

    #[test]
    fn test_serializes_with_camel_case_dates() {
        let material = RevisionMaterial::create(&NewMaterial {
            name: "Math".into(),
            extract: "a squared plus b squared".into(),
        });
        let json = serde_json::to_value(&material).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }
}
