use serde_json::Value;
use time::Date;
use tracing::info;
use uuid::Uuid;

use super::{
    dto::{CreateDayTestRequest, UpdateDayTestRequest},
    repo_types::{DayTest, NewDayTest, DATE_FORMAT},
};
use crate::{
    error::{found_any, AppError, AppResult},
    ownership::{owned_row, Resource},
    patch::Patch,
    store::Store,
    validation::{finish, optional},
};

const INVALID_DATE: &str = "Date must be a valid date (YYYY-MM-DD).";
const RESULTS_REQUIRED: &str = "Test results are required.";

fn date_field(raw: Option<&str>) -> Result<Date, String> {
    match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => {
            Date::parse(raw, DATE_FORMAT).map_err(|_| INVALID_DATE.to_string())
        }
        _ => Err("Date is required.".to_string()),
    }
}

/// Any JSON value except `null`.
fn results_field(value: Option<Value>) -> Result<Value, String> {
    value
        .filter(|v| !v.is_null())
        .ok_or_else(|| RESULTS_REQUIRED.to_string())
}

/// Day tests hang directly off the caller; there is no parent to check.
pub async fn create_day_test(
    store: &dyn Store,
    caller: Uuid,
    payload: CreateDayTestRequest,
) -> AppResult<DayTest> {
    let (date, test_results) = match (
        date_field(payload.date.as_deref()),
        results_field(payload.test_results),
    ) {
        (Ok(date), Ok(test_results)) => (date, test_results),
        (date, test_results) => {
            let errors = date.err().into_iter().chain(test_results.err()).collect();
            return Err(AppError::Validation(errors));
        }
    };

    let day_test = store
        .insert_day_test(
            caller,
            NewDayTest {
                date,
                test_results,
                notes: optional(payload.notes),
            },
        )
        .await?;
    info!(day_test_id = %day_test.id, user_id = %caller, "day test created");
    Ok(day_test)
}

pub async fn list_day_tests(store: &dyn Store, caller: Uuid) -> AppResult<Vec<DayTest>> {
    found_any(
        store.list_day_tests(caller).await?,
        "No day tests found for this user.",
    )
}

pub async fn get_day_test(store: &dyn Store, caller: Uuid, id: Uuid) -> AppResult<DayTest> {
    let row = store.find_day_test(id).await?;
    owned_row(store, Resource::DayTest, id, caller, row).await
}

pub async fn update_day_test(
    store: &dyn Store,
    caller: Uuid,
    id: Uuid,
    payload: UpdateDayTestRequest,
) -> AppResult<DayTest> {
    let row = store.find_day_test(id).await?;
    let mut day_test = owned_row(store, Resource::DayTest, id, caller, row).await?;

    let mut errors = Vec::new();
    match payload.date {
        Patch::Missing => {}
        Patch::Null => errors.push("Date is required.".into()),
        Patch::Value(raw) => match date_field(Some(&raw)) {
            Ok(date) => day_test.date = date,
            Err(message) => errors.push(message),
        },
    }
    match payload.test_results {
        Patch::Missing => {}
        Patch::Null => errors.push(RESULTS_REQUIRED.into()),
        Patch::Value(results) => match results_field(Some(results)) {
            Ok(results) => day_test.test_results = results,
            Err(message) => errors.push(message),
        },
    }
    finish(errors)?;

    match payload.notes {
        Patch::Value(notes) => day_test.notes = optional(Some(notes)),
        other => other.apply_to(&mut day_test.notes),
    }

    let day_test = store
        .update_day_test(&day_test)
        .await?
        .ok_or_else(|| AppError::not_found("Day test not found."))?;
    info!(day_test_id = %id, user_id = %caller, "day test updated");
    Ok(day_test)
}

pub async fn delete_day_test(store: &dyn Store, caller: Uuid, id: Uuid) -> AppResult<()> {
    let row = store.find_day_test(id).await?;
    owned_row(store, Resource::DayTest, id, caller, row).await?;
    store.delete_day_test(id).await?;
    info!(day_test_id = %id, user_id = %caller, "day test deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use super::*;
    use crate::store::memory::MemoryStore;

    fn body(date: &str) -> CreateDayTestRequest {
        CreateDayTestRequest {
            date: Some(date.into()),
            test_results: Some(json!({ "vocabulary": 18, "grammar": 7 })),
            notes: Some("  tired today ".into()),
        }
    }

    #[tokio::test]
    async fn create_parses_date_and_keeps_results_verbatim() {
        let store = MemoryStore::default();
        let owner = store.seed_user("a@example.com").await;
        let created = create_day_test(&store, owner, body("2024-12-03")).await.unwrap();
        assert_eq!(created.date, date!(2024 - 12 - 03));
        assert_eq!(created.test_results, json!({ "vocabulary": 18, "grammar": 7 }));
        assert_eq!(created.notes.as_deref(), Some("tired today"));
        assert_eq!(created.user_id, owner);

        let serialized = serde_json::to_value(&created).unwrap();
        assert_eq!(serialized["date"], "2024-12-03");
    }

    #[tokio::test]
    async fn create_rejects_bad_date_and_null_results() {
        let store = MemoryStore::default();
        let owner = store.seed_user("a@example.com").await;
        let err = create_day_test(
            &store,
            owner,
            CreateDayTestRequest {
                test_results: Some(serde_json::Value::Null),
                ..body("2024-13-40")
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(d) if d == [INVALID_DATE, RESULTS_REQUIRED]
        ));

        let err = create_day_test(
            &store,
            owner,
            CreateDayTestRequest {
                date: None,
                ..body("")
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(d) if d == ["Date is required."]));
    }

    #[tokio::test]
    async fn body_accepts_camel_case_results() {
        let payload: CreateDayTestRequest =
            serde_json::from_str(r#"{"date": "2024-01-02", "testResults": [1, 2]}"#).unwrap();
        let store = MemoryStore::default();
        let owner = store.seed_user("a@example.com").await;
        let created = create_day_test(&store, owner, payload).await.unwrap();
        assert_eq!(created.test_results, json!([1, 2]));
        assert_eq!(created.notes, None);
    }

    #[tokio::test]
    async fn ownership_is_the_user_reference() {
        let store = MemoryStore::default();
        let owner = store.seed_user("a@example.com").await;
        let intruder = store.seed_user("eve@example.com").await;
        let created = create_day_test(&store, owner, body("2024-12-03")).await.unwrap();

        assert!(matches!(
            get_day_test(&store, intruder, created.id).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            list_day_tests(&store, intruder).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            delete_day_test(&store, intruder, created.id).await,
            Err(AppError::Forbidden(_))
        ));
        assert_eq!(list_day_tests(&store, owner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_touches_only_supplied_fields() {
        let store = MemoryStore::default();
        let owner = store.seed_user("a@example.com").await;
        let created = create_day_test(&store, owner, body("2024-12-03")).await.unwrap();

        let payload: UpdateDayTestRequest =
            serde_json::from_str(r#"{"date": "2024-12-04", "notes": null}"#).unwrap();
        let updated = update_day_test(&store, owner, created.id, payload).await.unwrap();
        assert_eq!(updated.date, date!(2024 - 12 - 04));
        assert_eq!(updated.notes, None);
        assert_eq!(updated.test_results, created.test_results);

        let payload: UpdateDayTestRequest =
            serde_json::from_str(r#"{"testResults": null}"#).unwrap();
        assert!(matches!(
            update_day_test(&store, owner, created.id, payload).await,
            Err(AppError::Validation(_))
        ));

        delete_day_test(&store, owner, created.id).await.unwrap();
        assert!(matches!(
            get_day_test(&store, owner, created.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
