use costcast_core::store::{FileViewStore, InMemoryViewStore, ViewStore};
use costcast_core::view::View;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_in_memory_save_and_list() {
    let store = InMemoryViewStore::new();
    let first = store.save(View::new_default()).await.unwrap();
    let second = store.save(View::new_default()).await.unwrap();

    let views = store.list().await.unwrap();
    assert_eq!(views.len(), 2);
    assert_eq!(views[0].id, first.id);
    assert_eq!(views[1].id, second.id);
}

#[tokio::test]
async fn test_in_memory_save_replaces_by_id() {
    let store = InMemoryViewStore::new();
    let mut view = store.save(View::new_default()).await.unwrap();
    let first_saved_at = view.last_modified;

    view.name = "Renamed".to_string();
    view.settings.paygo_discount_percent = 35.0;
    let saved = store.save(view.clone()).await.unwrap();

    let views = store.list().await.unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].name, "Renamed");
    assert_eq!(views[0].settings.paygo_discount_percent, 35.0);
    assert!(saved.last_modified >= first_saved_at);
}

#[tokio::test]
async fn test_in_memory_get_and_delete() {
    let store = InMemoryViewStore::new();
    let view = store.save(View::new_default()).await.unwrap();

    assert_eq!(store.get(&view.id).await.unwrap().map(|v| v.id), Some(view.id.clone()));
    assert!(store.get("missing").await.unwrap().is_none());

    assert!(store.delete(&view.id).await.unwrap());
    assert!(!store.delete(&view.id).await.unwrap());
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_file_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("views.json");

    let saved = {
        let store = FileViewStore::new(&path);
        store.save(View::new_default()).await.unwrap()
    };

    let reopened = FileViewStore::new(&path);
    let views = reopened.list().await.unwrap();
    assert_eq!(views, vec![saved.clone()]);
    assert_eq!(reopened.get(&saved.id).await.unwrap(), Some(saved));
}

#[tokio::test]
async fn test_file_store_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileViewStore::new(dir.path().join("none.json"));
    assert!(store.list().await.unwrap().is_empty());
    assert!(!store.delete("anything").await.unwrap());
}

#[tokio::test]
async fn test_file_store_recovers_from_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("views.json");
    std::fs::write(&path, "{ this is not json").unwrap();

    let store = FileViewStore::new(&path);
    assert!(store.list().await.unwrap().is_empty());

    let saved = store.save(View::new_default()).await.unwrap();
    assert_eq!(store.list().await.unwrap(), vec![saved]);
}

#[tokio::test]
async fn test_file_store_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/deeper/views.json");
    let store = FileViewStore::new(&path);

    let saved = store.save(View::new_default()).await.unwrap();
    assert!(path.exists());
    assert!(store.delete(&saved.id).await.unwrap());
    assert!(store.list().await.unwrap().is_empty());
}
