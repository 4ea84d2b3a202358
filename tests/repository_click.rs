use chrono::{TimeZone, Utc};
use linkpulse::domain::entities::ClickRecord;
use linkpulse::domain::repositories::{ClickRepository, ClickStatsRepository, LinkResolver};
use linkpulse::infrastructure::persistence::{PgClickRepository, PgLinkRepository};
use sqlx::PgPool;
use std::sync::Arc;

async fn create_test_link(pool: &PgPool, code: &str, url: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO links (short_code, original_url) VALUES ($1, $2) RETURNING id")
        .bind(code)
        .bind(url)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn create_expired_link(pool: &PgPool, code: &str, url: &str) {
    sqlx::query(
        "INSERT INTO links (short_code, original_url, expires_at) VALUES ($1, $2, NOW() - INTERVAL '1 hour')",
    )
    .bind(code)
    .bind(url)
    .execute(pool)
    .await
    .unwrap();
}

#[sqlx::test]
async fn test_resolve_link_id(pool: PgPool) {
    let link_id = create_test_link(&pool, "abc123", "https://example.com").await;
    let repo = PgClickRepository::new(Arc::new(pool));

    assert_eq!(repo.resolve_link_id("abc123").await.unwrap(), link_id);
}

#[sqlx::test]
async fn test_resolve_unknown_link_id(pool: PgPool) {
    let repo = PgClickRepository::new(Arc::new(pool));

    let err = repo.resolve_link_id("missing").await.unwrap_err();

    assert!(err.is_not_found());
}

#[sqlx::test]
async fn test_record_click(pool: PgPool) {
    let link_id = create_test_link(&pool, "abc123", "https://example.com").await;
    let repo = PgClickRepository::new(Arc::new(pool.clone()));
    let clicked_at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();

    let record = ClickRecord {
        link_id,
        short_code: "abc123".to_string(),
        ip_address: Some("192.0.2.10".to_string()),
        user_agent: Some("TestBot/1.0".to_string()),
        referer: None,
        country: Some("DE".to_string()),
        clicked_at,
    };
    repo.record_click(&record).await.unwrap();

    let (ip, country, stored_at): (Option<String>, Option<String>, chrono::DateTime<Utc>) =
        sqlx::query_as("SELECT ip_address, country, clicked_at FROM clicks WHERE link_id = $1")
            .bind(link_id)
            .fetch_one(&pool)
            .await
            .unwrap();

    assert_eq!(ip.as_deref(), Some("192.0.2.10"));
    assert_eq!(country.as_deref(), Some("DE"));
    assert_eq!(stored_at, clicked_at);
}

async fn insert_click(pool: &PgPool, link_id: i64, ip: &str, days_ago: i32) {
    sqlx::query(
        "INSERT INTO clicks (link_id, ip_address, clicked_at) VALUES ($1, $2, NOW() - make_interval(days => $3))",
    )
    .bind(link_id)
    .bind(ip)
    .bind(days_ago)
    .execute(pool)
    .await
    .unwrap();
}

#[sqlx::test]
async fn test_click_stats(pool: PgPool) {
    let link_id = create_test_link(&pool, "abc123", "https://example.com").await;
    create_test_link(&pool, "quiet", "https://example.com/quiet").await;
    insert_click(&pool, link_id, "192.0.2.1", 0).await;
    insert_click(&pool, link_id, "192.0.2.1", 0).await;
    insert_click(&pool, link_id, "192.0.2.2", 3).await;
    let repo = PgClickRepository::new(Arc::new(pool));

    let stats = repo.click_stats("abc123").await.unwrap();
    assert_eq!(stats.total_clicks, 3);
    assert_eq!(stats.unique_clicks, 2);

    let quiet = repo.click_stats("quiet").await.unwrap();
    assert_eq!(quiet.total_clicks, 0);
    assert_eq!(quiet.unique_clicks, 0);

    assert!(repo.click_stats("missing").await.unwrap_err().is_not_found());
}

#[sqlx::test]
async fn test_daily_click_stats(pool: PgPool) {
    let link_id = create_test_link(&pool, "abc123", "https://example.com").await;
    insert_click(&pool, link_id, "192.0.2.1", 1).await;
    insert_click(&pool, link_id, "192.0.2.2", 1).await;
    insert_click(&pool, link_id, "192.0.2.1", 3).await;
    insert_click(&pool, link_id, "192.0.2.1", 20).await;
    let repo = PgClickRepository::new(Arc::new(pool));

    let daily = repo.daily_click_stats("abc123", 7).await.unwrap();

    assert_eq!(daily.len(), 2);
    assert_eq!(daily[0].clicks, 2);
    assert_eq!(daily[1].clicks, 1);
    assert!(daily[0].date > daily[1].date);

    assert_eq!(repo.daily_click_stats("abc123", 30).await.unwrap().len(), 3);
    assert!(
        repo.daily_click_stats("missing", 7)
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[sqlx::test]
async fn test_find_target_url(pool: PgPool) {
    create_test_link(&pool, "abc123", "https://example.com/target").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    let target = repo.find_target_url("abc123").await.unwrap();

    assert_eq!(target.as_deref(), Some("https://example.com/target"));
}

#[sqlx::test]
async fn test_find_target_url_skips_expired(pool: PgPool) {
    create_expired_link(&pool, "old", "https://example.com/old").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    assert_eq!(repo.find_target_url("old").await.unwrap(), None);
    assert_eq!(repo.find_target_url("missing").await.unwrap(), None);
}
