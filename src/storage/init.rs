//! Storage initialization
//!
//! First-run setup, default tag seeding and the duplicate-title repair.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::audit::EntityType;
use crate::config::paths::BudgetPaths;
use crate::config::settings::Settings;
use crate::error::BudgetError;
use crate::models::{Tag, DEFAULT_TAGS};

use super::{Repository, Storage};

/// Initialize storage for a fresh installation
///
/// Creates the directory layout and persists default settings if none exist.
/// Returns the settings in effect.
pub fn initialize_storage(paths: &BudgetPaths) -> Result<Settings, BudgetError> {
    paths.ensure_directories()?;

    let settings = Settings::load_or_create(paths)?;
    if !paths.is_initialized() {
        settings.save(paths)?;
        info!(base_dir = %paths.base_dir().display(), "initialized storage");
    }

    Ok(settings)
}

/// Insert the default tags, once per installation
///
/// Does nothing when `settings.tags_seeded` is already set. Returns the number
/// of tags created. If the marker cannot be saved, the tags are removed again
/// so the next run starts from the same state.
pub fn seed_default_tags(
    storage: &Storage,
    settings: &mut Settings,
    paths: &BudgetPaths,
) -> Result<usize, BudgetError> {
    if settings.tags_seeded {
        return Ok(0);
    }

    let tags: Vec<Tag> = DEFAULT_TAGS.iter().map(|name| Tag::new(*name)).collect();
    let before = storage.tags.snapshot()?;

    storage.write(&storage.tags, |repo| {
        tags.iter().try_for_each(|tag| repo.upsert(tag.clone()))
    })?;

    settings.tags_seeded = true;
    if let Err(err) = settings.save(paths) {
        warn!(error = %err, "failed to save seeding marker, removing default tags");
        settings.tags_seeded = false;
        storage.tags.restore(before)?;
        storage.tags.save()?;
        return Err(err);
    }

    for tag in &tags {
        storage.log_create(EntityType::Tag, tag.id.to_string(), Some(tag.name.clone()), tag);
    }

    info!(count = tags.len(), "seeded default tags");
    Ok(tags.len())
}

/// Rename expenses whose title repeats an earlier one
///
/// Expenses are visited oldest first. The first holder of a title keeps it;
/// each later duplicate gets the title followed by a counter shared across the
/// whole run (`Milk`, `Milk1`, `Bread`, `Bread2`, ...). A candidate that is
/// itself taken is skipped. Returns the number of expenses renamed.
pub fn dedupe_expense_titles(storage: &Storage) -> Result<usize, BudgetError> {
    let expenses = storage.expenses.get_all()?;

    let mut taken: HashSet<String> = HashSet::new();
    let mut renamed = Vec::new();
    let mut counter: u32 = 1;
    let existing: HashSet<&str> = expenses.iter().map(|e| e.title.as_str()).collect();

    for expense in &expenses {
        if taken.insert(expense.title.clone()) {
            continue;
        }

        let unique = loop {
            let candidate = format!("{}{}", expense.title, counter);
            counter += 1;
            if !taken.contains(&candidate) && !existing.contains(candidate.as_str()) {
                break candidate;
            }
        };

        taken.insert(unique.clone());
        let mut updated = expense.clone();
        updated.title = unique;
        renamed.push((expense.clone(), updated));
    }

    if renamed.is_empty() {
        return Ok(0);
    }

    storage.write(&storage.expenses, |repo| {
        renamed
            .iter()
            .try_for_each(|(_, updated)| repo.upsert(updated.clone()))
    })?;

    for (before, after) in &renamed {
        storage.log_update(
            EntityType::Expense,
            after.id.to_string(),
            Some(after.title.clone()),
            before,
            after,
        );
    }

    info!(count = renamed.len(), "renamed duplicate expense titles");
    Ok(renamed.len())
}
