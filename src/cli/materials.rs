use anyhow::Result;
use clap::Subcommand;
use std::io::Write;
use tracing::{debug, info};

use crate::materials::form::check;
use crate::materials::{MaterialError, MaterialPatch, MaterialRepository, NewMaterial, RevisionMaterial};

/// Manage revision materials without the terminal UI
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum MaterialCommand {
    /// List all materials
    List,

    /// Show one material in full
    Show {
        /// Material id
        id: String,
    },

    /// Add a material
    Add {
        /// Material name
        #[arg(short = 'n', long)]
        name: String,

        /// Text to revise
        #[arg(short = 'e', long)]
        extract: String,
    },

    /// Change the name and/or text of a material
    Update {
        /// Material id
        id: String,

        #[arg(short = 'n', long)]
        name: Option<String>,

        #[arg(short = 'e', long)]
        extract: Option<String>,
    },

    /// Delete a material
    Delete {
        /// Material id
        id: String,
    },

    /// Case-insensitive search on names and text
    Search {
        query: String,
    },
}

impl MaterialCommand {
    pub fn execute(&self, repository: &MaterialRepository, out: &mut impl Write) -> Result<()> {
        debug!(command = ?self, "Executing material command");

        match self {
            MaterialCommand::List => print_list(&repository.get_all()?, out),

            MaterialCommand::Show { id } => {
                let material = repository
                    .get_by_id(id)?
                    .ok_or_else(|| MaterialError::NotFound(id.clone()))?;
                writeln!(out, "{} ({})", material.name, material.id)?;
                writeln!(
                    out,
                    "Created {}  Updated {}  {} words",
                    material.created_at.format("%Y-%m-%d %H:%M"),
                    material.updated_at.format("%Y-%m-%d %H:%M"),
                    material.word_count()
                )?;
                writeln!(out)?;
                writeln!(out, "{}", material.extract)?;
                Ok(())
            }

            MaterialCommand::Add { name, extract } => {
                let errors = check(name, extract);
                if !errors.is_empty() {
                    return Err(MaterialError::Invalid(errors).into());
                }
                let material = repository.create(&NewMaterial {
                    name: name.clone(),
                    extract: extract.clone(),
                })?;
                info!(id = %material.id, "Material created");
                writeln!(out, "{}", material.id)?;
                Ok(())
            }

            MaterialCommand::Update { id, name, extract } => {
                let existing = repository
                    .get_by_id(id)?
                    .ok_or_else(|| MaterialError::NotFound(id.clone()))?;

                let errors = check(
                    name.as_deref().unwrap_or(&existing.name),
                    extract.as_deref().unwrap_or(&existing.extract),
                );
                if !errors.is_empty() {
                    return Err(MaterialError::Invalid(errors).into());
                }

                let patch = MaterialPatch {
                    name: name.clone(),
                    extract: extract.clone(),
                };
                let updated = repository
                    .update(id, &patch)?
                    .ok_or_else(|| MaterialError::NotFound(id.clone()))?;
                info!(id = %updated.id, "Material updated");
                writeln!(out, "Updated {}", updated.name)?;
                Ok(())
            }

            MaterialCommand::Delete { id } => {
                if !repository.delete(id)? {
                    return Err(MaterialError::NotFound(id.clone()).into());
                }
                info!(id = %id, "Material deleted");
                writeln!(out, "Deleted {}", id)?;
                Ok(())
            }

            MaterialCommand::Search { query } => print_list(&repository.search(query)?, out),
        }
    }
}

fn print_list(materials: &[RevisionMaterial], out: &mut impl Write) -> Result<()> {
    if materials.is_empty() {
        writeln!(out, "No materials found")?;
        return Ok(());
    }
    for material in materials {
        writeln!(
            out,
            "{}  {}  ({} words)",
            material.id,
            material.name,
            material.word_count()
        )?;
    }
    Ok(())
}
