use newscast_core::UserStore;

fn temp_dir(tag: &str) -> std::path::PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "newscast_{tag}_{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    dir
}

#[tokio::test]
async fn first_rating_wins() {
    let store = UserStore::in_memory();

    assert!(store.rate(7, 4).await);
    assert!(!store.rate(7, 2).await, "second rating attempt must be rejected");
    assert_eq!(store.rating_of(7).await, Some(4));
}

#[tokio::test]
async fn out_of_range_ratings_are_rejected() {
    let store = UserStore::in_memory();
    assert!(!store.rate(1, 0).await);
    assert!(!store.rate(1, 6).await);
    assert_eq!(store.rating_of(1).await, None);
}

#[tokio::test]
async fn mutations_persist_across_reload() {
    let dir = temp_dir("persist");
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let path = dir.join("users.json");

    let store = UserStore::load_from(&path).await;
    store.note_user(11).await;
    store.note_user(12).await;
    store.rate(11, 5).await;
    store.rate(12, 3).await;

    let reloaded = UserStore::load_from(&path).await;
    assert_eq!(reloaded.rating_of(11).await, Some(5));
    assert_eq!(reloaded.rating_of(12).await, Some(3));
    let stats = reloaded.stats().await;
    assert_eq!(stats.total_users, 2);
    assert_eq!(stats.total_ratings, 2);
    assert!((stats.average_rating - 4.0).abs() < f64::EPSILON);

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn corrupted_store_falls_back_to_tmp_file() {
    let dir = temp_dir("corrupt");
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let path = dir.join("users.json");

    tokio::fs::write(&path, b"{ this is not json ").await.unwrap();
    let valid = serde_json::json!({ "ratings": { "3": 5 }, "users": [3] });
    tokio::fs::write(
        dir.join("users.json.tmp"),
        serde_json::to_vec(&valid).unwrap(),
    )
    .await
    .unwrap();

    let store = UserStore::load_from(&path).await;
    assert_eq!(store.rating_of(3).await, Some(5));
    assert_eq!(store.stats().await.total_users, 1);

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn missing_store_starts_empty() {
    let dir = temp_dir("missing");
    let store = UserStore::load_from(dir.join("users.json")).await;
    let stats = store.stats().await;
    assert_eq!(stats.total_users, 0);
    assert_eq!(stats.total_ratings, 0);
    assert_eq!(stats.average_rating, 0.0);
}
