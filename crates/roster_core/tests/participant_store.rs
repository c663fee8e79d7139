use chrono::{TimeZone, Utc};
use roster_core::{
    KeyValueStore, MemoryKeyValueStore, Participant, ParticipantRepository, ParticipantStore,
    SaveOutcome, Skill, SqliteKeyValueStore, StorageError, StoreError, TechnicalSkills,
};
use std::sync::Arc;

fn participant(id: &str, name: &str) -> Participant {
    let now = Utc.with_ymd_and_hms(2025, 2, 10, 8, 30, 0).unwrap();
    Participant::with_id(id, name, format!("{}@example.com", name.to_lowercase()), now)
}

#[test]
fn absent_key_loads_as_empty_collection() {
    let store = ParticipantStore::new(MemoryKeyValueStore::new());
    assert!(store.load().is_empty());
}

#[test]
fn malformed_value_loads_as_empty_collection() {
    let kv = Arc::new(MemoryKeyValueStore::new());
    kv.set("participants", "{not json").unwrap();

    let store = ParticipantStore::new(Arc::clone(&kv));
    assert!(store.load().is_empty());
}

const DANA_AND_BROKEN_ELI: &str = r#"[
    {
        "id": "p-dana",
        "name": "Dana",
        "email": "dana@example.com",
        "createdAt": "2024-06-10T09:00:00.000Z",
        "updatedAt": "2024-06-10T09:00:00.000Z"
    },
    {
        "id": "p-eli",
        "name": "Eli",
        "email": "eli@example.com",
        "createdAt": "",
        "updatedAt": "2024-06-10T09:00:00.000Z"
    }
]"#;

#[test]
fn invalid_record_is_skipped_and_valid_records_load() {
    let kv = Arc::new(MemoryKeyValueStore::new());
    kv.set("participants", DANA_AND_BROKEN_ELI).unwrap();

    let loaded = ParticipantStore::new(Arc::clone(&kv)).load();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, "p-dana");
}

#[test]
fn valid_records_survive_save_next_to_an_invalid_one() {
    let kv = Arc::new(MemoryKeyValueStore::new());
    kv.set("participants", DANA_AND_BROKEN_ELI).unwrap();

    let repo = ParticipantRepository::new(Arc::clone(&kv));
    assert_eq!(repo.get_all().len(), 1);
    let outcome = repo.save(participant("p-fay", "Fay")).unwrap();
    assert_eq!(outcome, SaveOutcome::Created);

    let persisted = ParticipantStore::new(Arc::clone(&kv)).load();
    let ids: Vec<&str> = persisted.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p-dana", "p-fay"]);
}

#[test]
fn non_array_value_loads_as_empty_collection() {
    let kv = Arc::new(MemoryKeyValueStore::new());
    kv.set("participants", r#"{"id": "p-1"}"#).unwrap();

    assert!(ParticipantStore::new(Arc::clone(&kv)).load().is_empty());
}

#[test]
fn replace_then_load_preserves_order_and_fields() {
    let store = ParticipantStore::new(MemoryKeyValueStore::new());
    let mut ann = participant("p-1", "Ann");
    ann.github_id = Some("ann-gh".to_string());
    let bob = participant("p-2", "Bob");

    store.replace(&[ann.clone(), bob.clone()]).unwrap();

    assert_eq!(store.load(), vec![ann, bob]);
}

#[test]
fn failed_write_keeps_previous_value() {
    let kv = Arc::new(MemoryKeyValueStore::new());
    let store = ParticipantStore::new(Arc::clone(&kv));
    store.replace(&[participant("p-1", "Ann")]).unwrap();

    let used = kv.used_bytes().unwrap();
    kv.set_quota(Some(used)).unwrap();

    let err = store
        .replace(&[participant("p-1", "Ann"), participant("p-2", "Bob")])
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Write(StorageError::QuotaExceeded { .. })
    ));

    let loaded = store.load();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, "p-1");
}

#[test]
fn collection_uses_camel_case_wire_fields() {
    let kv = Arc::new(MemoryKeyValueStore::new());
    let store = ParticipantStore::new(Arc::clone(&kv));

    let mut ann = participant("p-1", "Ann");
    ann.phone_number = Some("+1 555 123 4567".to_string());
    ann.linked_in_profile = Some("https://www.linkedin.com/in/ann".to_string());
    let mut skills = TechnicalSkills::default();
    skills.set_rating(Skill::Angular, Some("8".to_string()));
    ann.technical_skills = Some(skills);
    store.replace(&[ann]).unwrap();

    let raw = kv.get("participants").unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let record = &json[0];
    assert_eq!(record["id"], "p-1");
    assert_eq!(record["phoneNumber"], "+1 555 123 4567");
    assert_eq!(record["linkedInProfile"], "https://www.linkedin.com/in/ann");
    assert_eq!(record["technicalSkills"]["angular"], "8");
    assert!(record.get("githubId").is_none());
    assert!(record["createdAt"].as_str().unwrap().starts_with("2025-02-10T08:30:00"));
    assert!(record["updatedAt"].is_string());
}

#[test]
fn loads_records_written_by_the_browser_roster() {
    let kv = Arc::new(MemoryKeyValueStore::new());
    kv.set(
        "participants",
        r#"[{
            "id": "1718000000000",
            "name": "Dana",
            "email": "dana@example.com",
            "phoneNumber": "",
            "linkedInProfile": "",
            "githubId": "dana",
            "technicalSkills": {"angular": "7", "python": "9", "css": "", "html": "5", "mysql": "6"},
            "trainingOutcome": null,
            "createdAt": "2024-06-10T09:00:00.000Z",
            "updatedAt": "2024-06-11T10:15:30.500Z"
        }]"#,
    )
    .unwrap();

    let loaded = ParticipantStore::new(Arc::clone(&kv)).load();
    assert_eq!(loaded.len(), 1);
    let dana = &loaded[0];
    assert_eq!(dana.id, "1718000000000");
    assert_eq!(dana.github_id.as_deref(), Some("dana"));
    assert_eq!(dana.rating(Skill::Python), Some("9"));
    assert!(!dana.is_fully_rated());
    assert!(dana.training_outcome.is_none());
    assert!(dana.updated_at > dana.created_at);
}

#[test]
fn custom_key_isolates_collections() {
    let kv = Arc::new(MemoryKeyValueStore::new());
    let default_store = ParticipantStore::new(Arc::clone(&kv));
    let cohort_store = ParticipantStore::with_key(Arc::clone(&kv), "cohort-2");

    cohort_store.replace(&[participant("c-1", "Cy")]).unwrap();

    assert_eq!(cohort_store.key(), "cohort-2");
    assert!(default_store.load().is_empty());
    assert_eq!(cohort_store.load().len(), 1);
}

#[test]
fn sqlite_backend_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.sqlite3");

    {
        let store = ParticipantStore::new(SqliteKeyValueStore::open(&path).unwrap());
        store
            .replace(&[participant("p-1", "Ann"), participant("p-2", "Bob")])
            .unwrap();
        store.replace(&[participant("p-2", "Bob")]).unwrap();
    }

    let reopened = ParticipantStore::new(SqliteKeyValueStore::open(&path).unwrap());
    let loaded = reopened.load();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, "p-2");
}

#[test]
fn sqlite_backend_treats_corrupt_value_as_empty() {
    let kv = SqliteKeyValueStore::open_in_memory().unwrap();
    kv.set("participants", "[{\"id\": 42}]").unwrap();

    let store = ParticipantStore::new(kv);
    assert!(store.load().is_empty());
}
