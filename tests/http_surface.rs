//! Drives a live dashboard server over HTTP.

use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::Value;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

use readiness_dashboard::catalog::Catalog;
use readiness_dashboard::config::Config;
use readiness_dashboard::server::{serve, AppState};
use readiness_dashboard::summary::{ReadinessData, EXPECTED_COLUMNS};

struct Harness {
    base: String,
    client: Client,
    _plots: TempDir,
}

async fn start(data: Option<ReadinessData>) -> Harness {
    let plots = TempDir::new().unwrap();
    fs::write(
        plots.path().join("internetpenetration_percent.html"),
        "<html><body>internet chart</body></html>",
    )
    .unwrap();

    let cfg = Config {
        bind: "127.0.0.1:0".to_string(),
        plots_dir: plots.path().to_path_buf(),
        reveal_delay_ms: 0,
        ..Config::default()
    };
    let state = AppState::new(Catalog::builtin(), &cfg, data);
    let listener = TcpListener::bind(&cfg.bind).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, state));

    Harness {
        base: format!("http://{}", addr),
        client: Client::builder().redirect(Policy::none()).build().unwrap(),
        _plots: plots,
    }
}

fn session_cookie(resp: &reqwest::Response) -> String {
    let raw = resp
        .headers()
        .get("set-cookie")
        .expect("session cookie")
        .to_str()
        .unwrap();
    raw.split(';').next().unwrap().to_string()
}

impl Harness {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn state(&self, cookie: &str) -> Value {
        self.client
            .get(self.url("/api/state"))
            .header("cookie", cookie)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn index_renders_first_metric_without_a_session() {
    let h = start(None).await;
    let resp = h.client.get(h.url("/")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-frame-options"], "SAMEORIGIN");
    assert_eq!(resp.headers()["x-content-type-options"], "nosniff");
    assert!(resp.headers().get("set-cookie").is_none());

    let body = resp.text().await.unwrap();
    assert!(body.contains("src=\"/plots/internetpenetration_percent.html\""));
    assert!(body.contains("<h2>Internet Penetration</h2>"));
    assert!(body.contains("Africa Central: AI Readiness Dashboard"));

    let state = h.client.get(h.url("/api/state")).send().await.unwrap();
    assert!(state.headers().get("set-cookie").is_none());
    let state: Value = state.json().await.unwrap();
    assert_eq!(state["selected_metric_id"], "InternetPenetration_Percent");
}

#[tokio::test]
async fn form_selection_redirects_and_sticks_to_session() {
    let h = start(None).await;
    let first = h
        .client
        .post(h.url("/select/MobilePhoneUsage_SubscriptionsPer100"))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::SEE_OTHER);
    let cookie = session_cookie(&first);
    assert!(cookie.starts_with("dash_session="));
    assert_eq!(h.state(&cookie).await["selected_metric_id"], "MobilePhoneUsage_SubscriptionsPer100");

    let resp = h
        .client
        .post(h.url("/select/BroadbandAccess_FixedSubscriptionsPer100"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/");
    assert!(resp.headers().get("set-cookie").is_none());

    let state = h.state(&cookie).await;
    assert_eq!(state["selected_metric_id"], "BroadbandAccess_FixedSubscriptionsPer100");
    assert_eq!(state["chart_path"], "/plots/broadbandaccess_fixedsubscriptionsper100.html");
    assert_eq!(
        state["description"],
        "Fixed broadband subscriptions per 100 people, showing infrastructure readiness."
    );

    let page = h
        .client
        .get(h.url("/"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("<h2>Broadband Access</h2>"));
}

#[tokio::test]
async fn unknown_metric_is_rejected_at_the_boundary() {
    let h = start(None).await;
    let resp = h
        .client
        .post(h.url("/select/GDPPerCapita_USD_Current"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = h
        .client
        .post(h.url("/api/select/internetpenetration_percent"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reselect_keeps_state_hash() {
    let h = start(None).await;
    let resp = h
        .client
        .post(h.url("/api/select/MobilePhoneUsage_SubscriptionsPer100"))
        .send()
        .await
        .unwrap();
    let cookie = session_cookie(&resp);
    let first: Value = resp.json().await.unwrap();

    // Let the zero-delay reveal land so both reads see the same flag.
    let mut revealed = false;
    for _ in 0..50 {
        if h.state(&cookie).await["revealed"] == true {
            revealed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(revealed, "reveal never fired");
    assert_eq!(first["selected_metric_id"], "MobilePhoneUsage_SubscriptionsPer100");

    let again: Value = h
        .client
        .post(h.url("/api/select/MobilePhoneUsage_SubscriptionsPer100"))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let after = h.state(&cookie).await;
    assert_eq!(again["state_hash"], after["state_hash"]);
    assert_eq!(after["selected_metric_id"], "MobilePhoneUsage_SubscriptionsPer100");
}

#[tokio::test]
async fn plots_are_served_with_etag_and_placeholder() {
    let h = start(None).await;
    let resp = h
        .client
        .get(h.url("/plots/internetpenetration_percent.html"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let etag = resp.headers()["etag"].to_str().unwrap().to_string();
    assert!(resp.text().await.unwrap().contains("internet chart"));

    let cached = h
        .client
        .get(h.url("/plots/internetpenetration_percent.html"))
        .header("if-none-match", &etag)
        .send()
        .await
        .unwrap();
    assert_eq!(cached.status(), StatusCode::NOT_MODIFIED);

    let missing = h
        .client
        .get(h.url("/plots/mobilephoneusage_subscriptionsper100.html"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert!(missing.text().await.unwrap().contains("Chart not available"));

    let bad = h.client.get(h.url("/plots/chart.js")).send().await.unwrap();
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn catalog_and_health() {
    let h = start(None).await;
    let catalog: Vec<Value> = h
        .client
        .get(h.url("/api/catalog"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog[2]["chart_path"], "/plots/broadbandaccess_fixedsubscriptionsper100.html");

    let health: Value = h
        .client
        .get(h.url("/api/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
}

#[tokio::test]
async fn summary_requires_data() {
    let h = start(None).await;
    let resp = h.client.get(h.url("/api/summary")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let csv = format!(
        "{}\nKenya,KEN,2019,InternetPenetration_Percent,20,Actual,ITU Data\n\
         Ghana,GHA,2020,InternetPenetration_Percent,40,Actual,ITU Data\n\
         Ghana,GHA,2020,CloudInfra_Score,12,Estimate,Internal Estimate\n",
        EXPECTED_COLUMNS.join(",")
    );
    let data = ReadinessData::from_reader(csv.as_bytes()).unwrap();
    let h = start(Some(data)).await;

    let stats: Vec<Value> = h
        .client
        .get(h.url("/api/summary"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0]["metric"], "InternetPenetration_Percent");
    assert_eq!(stats[0]["mean"], 30.0);

    let trend: Value = h
        .client
        .get(h.url("/api/trend/InternetPenetration_Percent"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(trend["points"].as_array().unwrap().len(), 2);

    let unknown = h.client.get(h.url("/api/trend/NotAMetric")).send().await.unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    let body: Value = unknown.json().await.unwrap();
    assert_eq!(body["error"], "unknown metric: NotAMetric");
}

#[tokio::test]
async fn full_store_refuses_new_sessions_but_keeps_existing() {
    let plots = TempDir::new().unwrap();
    let cfg = Config {
        bind: "127.0.0.1:0".to_string(),
        plots_dir: plots.path().to_path_buf(),
        reveal_delay_ms: 0,
        max_sessions: 1,
        ..Config::default()
    };
    let state = AppState::new(Catalog::builtin(), &cfg, None);
    let listener = TcpListener::bind(&cfg.bind).await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(serve(listener, state));
    let client = Client::new();

    let resp = client
        .post(format!("{}/api/select/BroadbandAccess_FixedSubscriptionsPer100", base))
        .send()
        .await
        .unwrap();
    let cookie = session_cookie(&resp);

    for _ in 0..3 {
        let anon = client.get(format!("{}/", base)).send().await.unwrap();
        assert_eq!(anon.status(), StatusCode::OK);
    }
    let refused = client
        .post(format!("{}/api/select/MobilePhoneUsage_SubscriptionsPer100", base))
        .send()
        .await
        .unwrap();
    assert_eq!(refused.status(), StatusCode::SERVICE_UNAVAILABLE);

    let kept: Value = client
        .get(format!("{}/api/state", base))
        .header("cookie", &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(kept["selected_metric_id"], "BroadbandAccess_FixedSubscriptionsPer100");
}
