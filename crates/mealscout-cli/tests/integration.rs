//! Integration tests for the mealscout CLI
//!
//! These tests run the binary against the offline fixture catalogue in
//! `tests/fixtures/recipes.json` (15 chicken recipes out of 30). Each test
//! gets its own HOME and working directory so no user configuration leaks in.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Get a Command for the mealscout binary, isolated in `home`
#[allow(deprecated)]
fn scout(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mealscout").expect("Failed to find mealscout binary");
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env_remove("MEALSCOUT_CONFIG")
        .env_remove("MEALSCOUT_API_ENDPOINT")
        .env_remove("MEALSCOUT_FIXTURE")
        .env_remove("RUST_LOG");
    cmd
}

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("recipes.json")
}

/// `scout` with the fixture catalogue and a short debounce
fn offline(home: &TempDir) -> Command {
    let mut cmd = scout(home);
    cmd.arg("--quiet").arg("--fixture").arg(fixture());
    cmd
}

fn search_json(home: &TempDir, args: &[&str]) -> Value {
    let output = offline(home)
        .args(["search", "--debounce-ms", "20", "--output", "json"])
        .args(args)
        .output()
        .expect("Failed to run mealscout");
    assert!(output.status.success(), "search failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("search output is not JSON")
}

// ============================================================================
// Search Tests
// ============================================================================

#[test]
fn test_search_first_page() {
    let home = TempDir::new().unwrap();
    let json = search_json(&home, &["chicken"]);

    assert_eq!(json["view"]["state"], "results");
    assert_eq!(json["view"]["recipes"].as_array().unwrap().len(), 12);
    assert_eq!(json["query"]["debounced_term"], "chicken");
    assert_eq!(json["query"]["page_size"], 12);
    assert_eq!(json["query"]["has_more"], true);
}

#[test]
fn test_search_loads_to_exhaustion() {
    let home = TempDir::new().unwrap();
    let json = search_json(&home, &["chicken", "--pages", "3"]);

    assert_eq!(json["view"]["recipes"].as_array().unwrap().len(), 15);
    assert_eq!(json["query"]["has_more"], false);
    assert_eq!(json["query"]["phase"], "exhausted");
    // 12 filled, 24 came back short: the window stays at 12
    assert_eq!(json["query"]["page_size"], 12);
}

#[test]
fn test_search_empty_term_lists_catalogue() {
    let home = TempDir::new().unwrap();
    let json = search_json(&home, &["--pages", "1"]);

    assert_eq!(json["query"]["debounced_term"], "");
    assert_eq!(json["view"]["recipes"].as_array().unwrap().len(), 24);
    assert_eq!(json["query"]["has_more"], true);
}

#[test]
fn test_search_no_matches() {
    let home = TempDir::new().unwrap();

    offline(&home)
        .args(["search", "xyzzy", "--debounce-ms", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No recipes found for \"xyzzy\""));
}

#[test]
fn test_search_text_output() {
    let home = TempDir::new().unwrap();

    scout(&home)
        .arg("--fixture")
        .arg(fixture())
        .args(["search", "tikka", "--debounce-ms", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 recipes for \"tikka\""))
        .stdout(predicate::str::contains("Chicken Tikka (Indian"))
        .stdout(predicate::str::contains("Share: http://localhost:5173/search?q=tikka"));
}

#[test]
fn test_search_term_from_url() {
    let home = TempDir::new().unwrap();
    let json = search_json(
        &home,
        &["--url", "http://app.test/recipes?sort=rating&q=katsu"],
    );

    assert_eq!(json["query"]["debounced_term"], "katsu");
    assert_eq!(json["view"]["recipes"][0]["name"], "Chicken Katsu");
    assert_eq!(json["location"], "http://app.test/recipes?sort=rating&q=katsu");
}

#[test]
fn test_search_term_replaces_url_term() {
    let home = TempDir::new().unwrap();
    let json = search_json(
        &home,
        &["ramen", "--url", "http://app.test/recipes?q=katsu&view=grid"],
    );

    assert_eq!(json["query"]["debounced_term"], "ramen");
    assert_eq!(json["location"], "http://app.test/recipes?q=ramen&view=grid");
}

#[test]
fn test_search_custom_page_size() {
    let home = TempDir::new().unwrap();
    let json = search_json(&home, &["chicken", "--page-size", "5", "--pages", "1"]);

    // The increment stays at its default of 12: 5, then 17 comes back short
    assert_eq!(json["view"]["recipes"].as_array().unwrap().len(), 15);
    assert_eq!(json["query"]["page_size"], 5);
    assert_eq!(json["query"]["has_more"], false);
}

#[test]
fn test_search_remote_failure() {
    let home = TempDir::new().unwrap();

    scout(&home)
        .args(["--quiet", "--endpoint", "http://127.0.0.1:9/graphql"])
        .args(["search", "soup", "--debounce-ms", "20"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Search failed"));
}

#[test]
fn test_interactive_searches_last_line() {
    let home = TempDir::new().unwrap();

    offline(&home)
        .args(["search", "--interactive", "--debounce-ms", "20"])
        .write_stdin("lemon\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Lemon Chicken"))
        .stdout(predicate::str::contains("Lemon Tart"));
}

#[test]
fn test_interactive_json_stream() {
    let home = TempDir::new().unwrap();

    let output = offline(&home)
        .args(["search", "--interactive", "--output", "json", "--debounce-ms", "20"])
        .write_stdin("satay\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let last: Value = serde_json::from_str(stdout.lines().last().unwrap()).unwrap();
    assert_eq!(last["query"]["debounced_term"], "satay");
    assert_eq!(last["view"]["recipes"][0]["name"], "Chicken Satay");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_term_is_the_only_remote_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "searchRecipes": [{ "id": "t1", "name": "Paneer Tikka" }] }
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let mut cmd = scout(&home);
    cmd.arg("--quiet")
        .arg("--endpoint")
        .arg(format!("{}/graphql", server.uri()))
        .args(["search", "tikka", "--output", "json"])
        .args(["--url", "http://localhost:5173/search?q=ramen"]);

    let output = tokio::task::spawn_blocking(move || cmd.output())
        .await
        .unwrap()
        .unwrap();
    assert!(output.status.success(), "search failed: {:?}", output);

    let requests = server.received_requests().await.unwrap();
    let terms: Vec<String> = requests
        .iter()
        .map(|request| {
            let body: Value = serde_json::from_slice(&request.body).unwrap();
            body["variables"]["searchTerm"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(terms, vec!["tikka"]);

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["view"]["recipes"][0]["name"], "Paneer Tikka");
    assert_eq!(json["location"], "http://localhost:5173/search?q=tikka");
}

// ============================================================================
// Recipe, Random and Similar Tests
// ============================================================================

#[test]
fn test_recipe_details() {
    let home = TempDir::new().unwrap();

    offline(&home)
        .args(["recipe", "r05", "--user", "u1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Beef Stew"))
        .stdout(predicate::str::contains("Ingredients:"))
        .stdout(predicate::str::contains("  - carrot"))
        .stdout(predicate::str::contains("Preparation:"));
}

#[test]
fn test_recipe_requires_user() {
    let home = TempDir::new().unwrap();

    offline(&home)
        .args(["recipe", "r05"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No user id"));
}

#[test]
fn test_recipe_not_found() {
    let home = TempDir::new().unwrap();

    offline(&home)
        .args(["recipe", "missing", "--user", "u1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to fetch recipe missing"));
}

#[test]
fn test_random_json() {
    let home = TempDir::new().unwrap();

    let output = offline(&home)
        .args(["random", "-n", "3", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let recipes: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(recipes.len(), 3);
}

#[test]
fn test_similar_recipes() {
    let home = TempDir::new().unwrap();

    let output = offline(&home)
        .args(["similar", "r02", "-n", "4", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let recipes: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(recipes.len(), 4);
    assert!(recipes.iter().all(|r| r["id"] != "r02"));
}

#[test]
fn test_similar_unknown_recipe() {
    let home = TempDir::new().unwrap();

    offline(&home)
        .args(["similar", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("similar to nope"));
}

// ============================================================================
// Per-user Tests
// ============================================================================

#[test]
fn test_favourites_json() {
    let home = TempDir::new().unwrap();

    let output = offline(&home)
        .args(["favourites", "--user", "u1", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let recipes: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = recipes.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["r04", "r09"]);
    assert!(recipes.iter().all(|r| r["favourite"] == true));
}

#[test]
fn test_favourites_text_uses_configured_user() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join(".mealscout");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "[api]\nuser_id = \"u9\"\n").unwrap();

    scout(&home)
        .arg("--fixture")
        .arg(fixture())
        .args(["favourites", "-n", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Favourites of u9"))
        .stdout(predicate::str::contains("Miso Soup"))
        .stdout(predicate::str::contains("Falafel Wrap").not());
}

#[test]
fn test_recommend_ranks_against_favourites() {
    let home = TempDir::new().unwrap();

    let output = offline(&home)
        .args(["recommend", "-u", "u1", "-n", "3", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let recs: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = recs
        .iter()
        .map(|r| r["recipe"]["id"].as_str().unwrap())
        .collect();
    // Japanese and Middle Eastern like the two favourites, best rated first
    assert_eq!(ids, vec!["c14", "r13", "r11"]);
    assert!(recs[0]["score"].as_f64().unwrap() >= recs[2]["score"].as_f64().unwrap());
}

#[test]
fn test_recommend_requires_user() {
    let home = TempDir::new().unwrap();

    offline(&home)
        .arg("recommend")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No user id"));
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_path_json() {
    let home = TempDir::new().unwrap();

    let output = scout(&home)
        .args(["config", "path", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let paths: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(paths["global_exists"], false);
    assert_eq!(paths["local_exists"], false);
    assert!(paths["local"]
        .as_str()
        .unwrap()
        .ends_with(".mealscout/config.toml"));
}

#[test]
fn test_config_init_and_show() {
    let home = TempDir::new().unwrap();

    scout(&home).args(["config", "init"]).assert().success();
    assert!(home.path().join(".mealscout/config.toml").exists());

    scout(&home)
        .args(["config", "show", "search.page_size"])
        .assert()
        .success()
        .stdout(predicate::str::diff("12\n"));

    scout(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[search]"))
        .stdout(predicate::str::contains("debounce_ms = 500"));
}

#[test]
fn test_config_init_global() {
    let home = TempDir::new().unwrap();

    scout(&home)
        .args(["config", "init", "--global"])
        .assert()
        .success();

    scout(&home)
        .args(["config", "path", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"global_exists\": true"));
}

#[test]
fn test_local_config_is_used() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join(".mealscout");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        format!(
            "[api]\nfixture = {:?}\n\n[search]\ndebounce_ms = 10\npage_size = 4\n",
            fixture()
        ),
    )
    .unwrap();

    let output = scout(&home)
        .args(["--quiet", "search", "chicken", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["view"]["recipes"].as_array().unwrap().len(), 4);
}

#[test]
fn test_unknown_config_key() {
    let home = TempDir::new().unwrap();

    scout(&home)
        .args(["config", "show", "search.nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_invalid_config_file() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("broken.toml");
    std::fs::write(&path, "[search]\npage_size = 0\n").unwrap();

    scout(&home)
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Invalid configuration: check `search.page_size`",
        ))
        .stderr(predicate::str::contains("must be greater than zero"));
}

#[test]
fn test_unknown_log_level_in_local_config() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join(".mealscout");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "[logging]\nlevel = \"chatty\"\n").unwrap();

    scout(&home)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("check `logging.level`"))
        .stderr(predicate::str::contains("'chatty' is not one of"));
}
