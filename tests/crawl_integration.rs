/*!
 * Integration tests for fetching, crawling, and searching over a local
 * static-shelf fixture served with tiny_http
 */

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::unbounded;
use rayon::ThreadPoolBuilder;
use tiny_http::{Response, Server};

use shelfview::client::FetchClient;
use shelfview::config::Config;
use shelfview::crawler::{CrawlEvent, Crawler};
use shelfview::index::SearchIndex;
use shelfview::search::compute_visible;
use shelfview::types::{Entry, EntryKind};

fn listing(entries: &[Entry]) -> String {
    serde_json::to_string(entries).unwrap()
}

fn dir(name: &str, path: &str) -> Entry {
    Entry::new(name, path, EntryKind::Dir)
}

fn file(name: &str, path: &str) -> Entry {
    Entry::new(name, path, EntryKind::File)
}

/// Serve fixed routes on an ephemeral port; unknown routes answer 404.
/// Returns the base URL. The server thread lives until the process exits.
fn serve(routes: HashMap<String, String>) -> String {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();

    thread::spawn(move || {
        for request in server.incoming_requests() {
            let response = match routes.get(request.url()) {
                Some(body) => Response::from_string(body.clone()),
                None => Response::from_string("not found").with_status_code(404),
            };
            let _ = request.respond(response);
        }
    });

    format!("http://{}", addr)
}

/// Fixture shelf:
///
/// ```text
/// shelf/
///   Alpha/            (dir)
///     readme.md       (file)
///     sub/            (dir)
///       notes.txt     (file)
///   Beta/             (dir, listing broken: 404)
///   Gamma             (link)
/// ```
fn fixture_routes() -> HashMap<String, String> {
    let mut routes = HashMap::new();
    routes.insert(
        "/shelf/index.json".to_string(),
        listing(&[
            dir("Alpha", "shelf/Alpha"),
            dir("Beta", "shelf/Beta"),
            Entry::new("Gamma", "https://example.org/gamma", EntryKind::Link),
        ]),
    );
    routes.insert(
        "/shelf/Alpha/index.json".to_string(),
        listing(&[
            file("readme.md", "shelf/Alpha/readme.md"),
            dir("sub", "shelf/Alpha/sub"),
        ]),
    );
    routes.insert(
        "/shelf/Alpha/sub/index.json".to_string(),
        listing(&[file("notes.txt", "shelf/Alpha/sub/notes.txt")]),
    );
    routes.insert(
        "/shelf/Alpha/readme.md".to_string(),
        "hello shelf".to_string(),
    );
    routes
}

fn fixture_config(base_url: String) -> Config {
    Config {
        base_url,
        root: "shelf".to_string(),
        num_threads: 2,
        theme_override: None,
        data_dir: None,
        log_file: None,
    }
}

// Every successful fetch merges its batch into the index, display-driven or
// not; failed fetches carry the attempted path and merge nothing
#[test]
fn test_fetch_children_merges_into_index() {
    let config = fixture_config(serve(fixture_routes()));
    let index = Arc::new(SearchIndex::new());
    let client = FetchClient::new(config, Arc::clone(&index));

    let entries = client.fetch_children("shelf").unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(index.len(), 3);

    let err = client.fetch_children("shelf/Beta").unwrap_err();
    assert_eq!(err.path(), "shelf/Beta");
    assert_eq!(index.len(), 3);
}

#[test]
fn test_fetch_file_returns_content() {
    let config = fixture_config(serve(fixture_routes()));
    let index = Arc::new(SearchIndex::new());
    let client = FetchClient::new(config, Arc::clone(&index));

    let content = client.fetch_file("shelf/Alpha/readme.md").unwrap();
    assert_eq!(content, "hello shelf");

    // Raw file fetches never touch the index
    assert!(index.is_empty());
}

// The background crawl walks the whole tree, one broken branch does not
// stop the others, and the finished index answers full-tree searches
#[test]
fn test_crawl_indexes_tree_despite_failing_branch() {
    let config = fixture_config(serve(fixture_routes()));
    let index = Arc::new(SearchIndex::new());
    let client = Arc::new(FetchClient::new(config, Arc::clone(&index)));

    let pool = Arc::new(ThreadPoolBuilder::new().num_threads(2).build().unwrap());
    let (crawl_tx, crawl_rx) = unbounded();
    let crawler = Crawler::new(Arc::clone(&client), pool, crawl_tx);

    let top_level = client.fetch_children("shelf").unwrap();
    crawler.crawl_listing(&top_level);

    // Wait for all three directory crawls to report in
    let mut indexed = HashSet::new();
    let mut failed = HashSet::new();
    let deadline = Instant::now() + Duration::from_secs(10);
    while indexed.len() + failed.len() < 3 {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match crawl_rx.recv_timeout(remaining) {
            Ok(CrawlEvent::Indexed { path, .. }) => {
                indexed.insert(path);
            }
            Ok(CrawlEvent::Failed { path }) => {
                failed.insert(path);
            }
            Err(_) => panic!("crawl did not finish before the deadline"),
        }
    }

    assert!(indexed.contains("shelf/Alpha"));
    assert!(indexed.contains("shelf/Alpha/sub"));
    assert_eq!(failed.into_iter().collect::<Vec<_>>(), vec!["shelf/Beta"]);

    // Full-tree search sees the nested file even though nothing was expanded
    let snapshot = index.snapshot();
    let visible = compute_visible("notes", &top_level, &snapshot);
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].name, "Alpha");

    // The broken branch still matches directly by name
    let visible = compute_visible("Beta", &top_level, &snapshot);
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].name, "Beta");
}

// Repeat crawl requests for the same path are coalesced
#[test]
fn test_crawl_coalesces_repeat_paths() {
    let config = fixture_config(serve(fixture_routes()));
    let index = Arc::new(SearchIndex::new());
    let client = Arc::new(FetchClient::new(config, Arc::clone(&index)));

    let pool = Arc::new(ThreadPoolBuilder::new().num_threads(2).build().unwrap());
    let (crawl_tx, crawl_rx) = unbounded();
    let crawler = Crawler::new(Arc::clone(&client), pool, crawl_tx);

    crawler.crawl_dir("shelf/Alpha/sub".to_string());
    crawler.crawl_dir("shelf/Alpha/sub".to_string());

    let event = crawl_rx.recv_timeout(Duration::from_secs(10)).unwrap();
    assert!(matches!(event, CrawlEvent::Indexed { ref path, .. } if path == "shelf/Alpha/sub"));

    // Only the first request went out; the second was dropped at the door
    assert!(crawl_rx.recv_timeout(Duration::from_millis(300)).is_err());
    assert_eq!(index.len(), 1);
}
