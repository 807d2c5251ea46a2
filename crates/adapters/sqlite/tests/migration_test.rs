use estoque_adapter_sqlite::{Migration, MigrationManager, SqliteConfig, create_pool};

fn migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            2,
            "create_pallets",
            "CREATE TABLE pallets (id INTEGER PRIMARY KEY); CREATE INDEX idx_pallets_id ON pallets (id);",
        ),
        Migration::new(1, "create_docks", "CREATE TABLE docks (id INTEGER PRIMARY KEY);"),
    ]
}

#[tokio::test]
async fn test_migrate_applies_in_version_order() {
    let pool = create_pool(&SqliteConfig::in_memory()).await.unwrap();
    let manager = MigrationManager::new(pool.clone());

    let result = manager.migrate(&migrations()).await.unwrap();

    assert!(result.is_success());
    assert_eq!(result.applied, vec![1, 2]);
    assert_eq!(manager.current_version().await.unwrap(), Some(2));

    let applied = manager.get_applied_migrations().await.unwrap();
    assert_eq!(applied.len(), 2);
    assert_eq!(applied[0].name, "create_docks");
}

#[tokio::test]
async fn test_migrate_twice_skips_applied() {
    let pool = create_pool(&SqliteConfig::in_memory()).await.unwrap();
    let manager = MigrationManager::new(pool);

    manager.migrate(&migrations()).await.unwrap();
    let second = manager.migrate(&migrations()).await.unwrap();

    assert_eq!(second.applied_count(), 0);
    assert_eq!(second.skipped, vec![1, 2]);
}

#[tokio::test]
async fn test_modified_migration_is_reported() {
    let pool = create_pool(&SqliteConfig::in_memory()).await.unwrap();
    let manager = MigrationManager::new(pool);

    manager.migrate(&migrations()).await.unwrap();

    let modified = vec![Migration::new(
        1,
        "create_docks",
        "CREATE TABLE docks (id INTEGER PRIMARY KEY, name TEXT);",
    )];
    let result = manager.migrate(&modified).await.unwrap();
    assert!(!result.is_success());
    assert_eq!(result.errors[0].version, 1);

    assert!(manager.migrate_strict(&modified).await.is_err());
}

#[tokio::test]
async fn test_failed_migration_stops_and_rolls_back() {
    let pool = create_pool(&SqliteConfig::in_memory()).await.unwrap();
    let manager = MigrationManager::new(pool);

    let broken = vec![
        Migration::new(1, "broken", "CREATE TABLE oops (;"),
        Migration::new(2, "never_reached", "CREATE TABLE fine (id INTEGER);"),
    ];
    let result = manager.migrate(&broken).await.unwrap();

    assert!(result.applied.is_empty());
    assert_eq!(result.errors.len(), 1);
    assert_eq!(manager.current_version().await.unwrap(), None);
}
