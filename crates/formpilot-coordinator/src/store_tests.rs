use formpilot_protocols::store::keys;

use super::*;

#[tokio::test]
async fn test_file_store_set_get_remove() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().to_path_buf());

    assert_eq!(store.get(keys::API_KEY).await.unwrap(), None);

    store.set(keys::API_KEY, "secret-key").await.unwrap();
    assert_eq!(
        store.get(keys::API_KEY).await.unwrap().as_deref(),
        Some("secret-key")
    );

    store.remove(keys::API_KEY).await.unwrap();
    assert_eq!(store.get(keys::API_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = FileStore::new(dir.path().to_path_buf());
        store
            .set(keys::RESUME_TEXT, "Ada Lovelace\nMathematician")
            .await
            .unwrap();
    }

    let reopened = FileStore::new(dir.path().to_path_buf());
    assert_eq!(
        reopened.get(keys::RESUME_TEXT).await.unwrap().as_deref(),
        Some("Ada Lovelace\nMathematician")
    );
}

#[tokio::test]
async fn test_file_store_preserves_multiline_values() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().to_path_buf());

    let value = "line one\nline \"two\"\n\ttabbed";
    store.set(keys::RESUME_TEXT, value).await.unwrap();
    assert_eq!(
        store.get(keys::RESUME_TEXT).await.unwrap().as_deref(),
        Some(value)
    );
}

#[tokio::test]
async fn test_file_store_remove_absent_key_is_ok() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().to_path_buf());
    store.remove("never_set").await.unwrap();
}

#[tokio::test]
async fn test_memory_store_round_trip() {
    let store = MemoryStore::new();

    store.set(keys::MODEL, "gemini-2.5-pro").await.unwrap();
    assert_eq!(
        store.get(keys::MODEL).await.unwrap().as_deref(),
        Some("gemini-2.5-pro")
    );

    store.set(keys::MODEL, "gemini-2.5-flash").await.unwrap();
    assert_eq!(
        store.get(keys::MODEL).await.unwrap().as_deref(),
        Some("gemini-2.5-flash")
    );

    store.remove(keys::MODEL).await.unwrap();
    assert_eq!(store.get(keys::MODEL).await.unwrap(), None);
}
