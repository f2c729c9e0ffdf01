use tracing::info;
use uuid::Uuid;

use super::{
    dto::{CreateSkillRequest, UpdateSkillRequest},
    repo_types::{Performance, SkillPerformance, PERFORMANCE_CHOICES},
};
use crate::{
    error::{found_any, AppError, AppResult},
    ownership::{ensure_owner, owned_row, Resource},
    patch::Patch,
    store::Store,
    validation::{finish, required},
};

/// Absent or blank input is "required"; anything outside the three levels lists the choices.
fn performance_field(raw: Option<&str>) -> Result<Performance, String> {
    match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw.parse().map_err(|()| PERFORMANCE_CHOICES.to_string()),
        _ => Err("Performance is required.".to_string()),
    }
}

pub async fn create_skill(
    store: &dyn Store,
    caller: Uuid,
    metadata_id: Uuid,
    payload: CreateSkillRequest,
) -> AppResult<SkillPerformance> {
    let mut errors = Vec::new();
    let skill = required(payload.skill.as_deref(), "Skill", &mut errors);
    let performance = match performance_field(payload.performance.as_deref()) {
        Ok(performance) => performance,
        Err(message) => {
            errors.push(message);
            return Err(AppError::Validation(errors));
        }
    };
    finish(errors)?;

    ensure_owner(store, Resource::Metadata, metadata_id, caller).await?;

    let skill = store.insert_skill(metadata_id, &skill, performance).await?;
    info!(skill_id = %skill.id, %metadata_id, user_id = %caller, "skill performance created");
    Ok(skill)
}

pub async fn list_skills(
    store: &dyn Store,
    caller: Uuid,
    metadata_id: Uuid,
) -> AppResult<Vec<SkillPerformance>> {
    ensure_owner(store, Resource::Metadata, metadata_id, caller).await?;
    found_any(
        store.list_skills(metadata_id).await?,
        "No skills performance found for this metadata.",
    )
}

pub async fn get_skill(store: &dyn Store, caller: Uuid, id: Uuid) -> AppResult<SkillPerformance> {
    let row = store.find_skill(id).await?;
    owned_row(store, Resource::SkillPerformance, id, caller, row).await
}

pub async fn update_skill(
    store: &dyn Store,
    caller: Uuid,
    id: Uuid,
    payload: UpdateSkillRequest,
) -> AppResult<SkillPerformance> {
    let row = store.find_skill(id).await?;
    let mut skill = owned_row(store, Resource::SkillPerformance, id, caller, row).await?;

    let mut errors = Vec::new();
    payload
        .skill
        .apply_required(&mut skill.skill, "Skill", &mut errors);
    let performance = match payload.performance {
        Patch::Missing => Ok(skill.performance),
        Patch::Null => performance_field(None),
        Patch::Value(raw) => performance_field(Some(&raw)),
    };
    match performance {
        Ok(performance) => skill.performance = performance,
        Err(message) => errors.push(message),
    }
    finish(errors)?;

    let skill = store
        .update_skill(&skill)
        .await?
        .ok_or_else(|| AppError::not_found("Skill performance not found."))?;
    info!(skill_id = %id, user_id = %caller, "skill performance updated");
    Ok(skill)
}

pub async fn delete_skill(store: &dyn Store, caller: Uuid, id: Uuid) -> AppResult<()> {
    let row = store.find_skill(id).await?;
    owned_row(store, Resource::SkillPerformance, id, caller, row).await?;
    store.delete_skill(id).await?;
    info!(skill_id = %id, user_id = %caller, "skill performance deleted");
    Ok(())
}
