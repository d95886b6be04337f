use crate::common::{article_html, create_test_config, record};
use archive_harvester::config::Config;
use archive_harvester::crawler::{harvest_articles, ArticleCrawler};
use archive_harvester::storage::{save_index, FsArticleStore};
use archive_harvester::HarvestError;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts article `slug` with `text` as its body
async fn mount_article(server: &MockServer, slug: &str, text: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/ru/{}/", slug)))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_html(text)))
        .expect(1)
        .mount(server)
        .await;
}

fn crawler_writing_to(config: &Config, dir: &TempDir) -> ArticleCrawler {
    let mut config = config.clone();
    config.output.articles_dir = dir.path().to_string_lossy().into_owned();
    ArticleCrawler::new(&config).expect("Failed to create crawler")
}

fn stored_files(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_reserved_record_is_neither_fetched_nor_written() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_html("PDF issue")))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), 1, 5);
    let mut crawler = crawler_writing_to(&config, &dir);

    let records = vec![record(&server.uri(), "nomer-ot-123")];
    crawler.crawl_articles(&records).await.expect("Crawl failed");

    assert!(stored_files(&dir).is_empty());
    assert_eq!(crawler.stats().fetched, 0);
    assert_eq!(crawler.stats().skipped_marker, 1);
}

#[tokio::test]
async fn test_articles_written_under_basename() {
    let server = MockServer::start().await;
    mount_article(&server, "first-story", "First body").await;
    mount_article(&server, "second-story", "Second body").await;
    mount_article(&server, "third-story", "Third body").await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), 1, 2);
    let mut crawler = crawler_writing_to(&config, &dir);

    let records: Vec<_> = ["first-story", "second-story", "third-story"]
        .iter()
        .map(|slug| record(&server.uri(), slug))
        .collect();
    crawler.crawl_articles(&records).await.expect("Crawl failed");

    assert_eq!(
        stored_files(&dir),
        vec!["first-story", "second-story", "third-story"]
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("second-story")).unwrap(),
        "Second body"
    );
    assert_eq!(crawler.stats().windows, 2);
    assert_eq!(crawler.stats().written, 3);
}

#[tokio::test]
async fn test_non_success_article_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ru/gone/"))
        .respond_with(ResponseTemplate::new(410))
        .expect(1)
        .mount(&server)
        .await;
    mount_article(&server, "kept", "Kept body").await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), 1, 5);
    let mut crawler = crawler_writing_to(&config, &dir);

    let records = vec![record(&server.uri(), "gone"), record(&server.uri(), "kept")];
    crawler.crawl_articles(&records).await.expect("Crawl failed");

    assert_eq!(stored_files(&dir), vec!["kept"]);
    assert_eq!(crawler.stats().non_success, 1);
    assert_eq!(crawler.stats().written, 1);
}

#[tokio::test]
async fn test_missing_container_aborts_but_keeps_written_files() {
    let server = MockServer::start().await;
    mount_article(&server, "early", "Early body").await;
    Mock::given(method("GET"))
        .and(path("/ru/broken/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>Oops</body></html>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ru/late/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_html("Late body")))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), 1, 1);
    let mut crawler = crawler_writing_to(&config, &dir);

    let records: Vec<_> = ["early", "broken", "late"]
        .iter()
        .map(|slug| record(&server.uri(), slug))
        .collect();
    let result = crawler.crawl_articles(&records).await;

    assert!(matches!(result, Err(HarvestError::Extract { .. })));
    assert_eq!(stored_files(&dir), vec!["early"]);
}

#[tokio::test]
async fn test_harvest_articles_end_to_end() {
    let server = MockServer::start().await;
    mount_article(&server, "story-1", "Body one").await;
    mount_article(&server, "story-2", "Body two").await;

    let dir = TempDir::new().unwrap();
    let index_path = dir.path().join("pages.json");
    let articles_dir = dir.path().join("articles");

    let records = vec![
        record(&server.uri(), "story-1"),
        record(&server.uri(), "nomer-ot-7-maya"),
        record(&server.uri(), "story-2"),
    ];
    save_index(&index_path, &records).unwrap();

    let mut config = create_test_config(&server.uri(), 1, 2);
    config.output.index_path = index_path.to_string_lossy().into_owned();
    config.output.articles_dir = articles_dir.to_string_lossy().into_owned();

    let stats = harvest_articles(&config).await.expect("Harvest failed");

    assert!(articles_dir.is_dir());
    assert_eq!(stats.written, 2);
    assert_eq!(stats.skipped_marker, 1);
    assert_eq!(
        std::fs::read_to_string(articles_dir.join("story-1")).unwrap(),
        "Body one"
    );
    assert!(!articles_dir.join("nomer-ot-7-maya").exists());
}

#[tokio::test]
async fn test_missing_index_fails_after_creating_dir() {
    let dir = TempDir::new().unwrap();
    let articles_dir = dir.path().join("articles");

    let mut config = create_test_config("http://127.0.0.1:9", 1, 2);
    config.output.index_path = dir.path().join("missing.json").to_string_lossy().into_owned();
    config.output.articles_dir = articles_dir.to_string_lossy().into_owned();

    let result = harvest_articles(&config).await;
    assert!(matches!(result, Err(HarvestError::Storage(_))));
    assert!(articles_dir.is_dir());
}

#[tokio::test]
async fn test_skip_existing_avoids_refetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ru/old/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_html("New body")))
        .expect(0)
        .mount(&server)
        .await;
    mount_article(&server, "fresh", "Fresh body").await;

    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("old"), "Old body").unwrap();

    let mut config = create_test_config(&server.uri(), 1, 5);
    config.crawler.skip_existing = true;
    let mut crawler = crawler_writing_to(&config, &dir);

    let records = vec![record(&server.uri(), "old"), record(&server.uri(), "fresh")];
    crawler.crawl_articles(&records).await.expect("Crawl failed");

    assert_eq!(
        std::fs::read_to_string(dir.path().join("old")).unwrap(),
        "Old body"
    );
    assert_eq!(crawler.stats().skipped_existing, 1);
    assert_eq!(crawler.stats().written, 1);
}

#[tokio::test]
async fn test_rerun_redownloads_by_default() {
    let server = MockServer::start().await;
    mount_article(&server, "story", "Current body").await;

    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("story"), "Stale body").unwrap();

    let config = create_test_config(&server.uri(), 1, 5);
    let store = Arc::new(FsArticleStore::new(dir.path()));
    let client = archive_harvester::crawler::HttpClient::from_config(
        &config.crawler,
        &config.user_agent,
    )
    .unwrap();
    let mut crawler = ArticleCrawler::with_parts(&config, client, store.clone()).unwrap();

    crawler
        .crawl_articles(&[record(&server.uri(), "story")])
        .await
        .expect("Crawl failed");

    assert_eq!(
        std::fs::read_to_string(store.path_for("story")).unwrap(),
        "Current body"
    );
}
