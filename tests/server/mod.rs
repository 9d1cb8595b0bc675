use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

/// Requests received by the fake tracker endpoints: (path, JSON body)
pub type RequestLog = Arc<Mutex<Vec<(String, Value)>>>;

pub struct TestServer {
    pub url: String,
    pub requests: RequestLog,
}

#[allow(dead_code)]
impl TestServer {
    pub fn page(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }

    pub fn recorded(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }
}

/// 128 characters, inside the accepted meta description range
#[allow(dead_code)]
pub const GOOD_DESCRIPTION: &str = "This page explains how the audit works, which checks it runs against each page, and how findings end up in the tracker each day.";

fn good_page() -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>Good page</title>
  <meta name="description" content="{}">
  <link rel="canonical" href="https://example.com/good">
</head>
<body>
  <h1>Welcome</h1>
  <img src="/logo.png" alt="Logo">
  <a href="/ok">Working</a>
  <a href="/redirect">Redirecting</a>
  <a href="mailto:team@example.com">Mail</a>
  <a href="tel:+15550100">Call</a>
  <a href="javascript:void(0)">Script</a>
  <a>No target</a>
</body>
</html>"#,
        GOOD_DESCRIPTION
    )
}

const BAD_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Bad page</title>
  <link rel="canonical" href="http://example.com/bad">
</head>
<body>
  <h1>First</h1>
  <h1>Second</h1>
  <img src="/images/photo.png">
  <a href="/ok">Working</a>
  <a href="/not-found">Missing</a>
  <a href="server-error">Failing</a>
</body>
</html>"#;

fn record(log: &RequestLog, req: &HttpRequest, body: &Value) -> bool {
    log.lock()
        .unwrap()
        .push((req.path().to_string(), body.clone()));

    req.headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic "))
}

async fn create_issue(
    req: HttpRequest,
    body: web::Json<Value>,
    log: web::Data<RequestLog>,
) -> HttpResponse {
    if !record(&log, &req, &body) {
        return HttpResponse::Unauthorized().finish();
    }

    if req.path().starts_with("/jira-reject") {
        return HttpResponse::BadRequest().json(json!({
            "errorMessages": [],
            "errors": {"project": "valid project is required"}
        }));
    }

    HttpResponse::Created().json(json!({
        "id": "10042",
        "key": "SCRUM-42",
        "self": "https://example.atlassian.net/rest/api/2/issue/10042"
    }))
}

async fn create_link(
    req: HttpRequest,
    body: web::Json<Value>,
    log: web::Data<RequestLog>,
) -> HttpResponse {
    if !record(&log, &req, &body) {
        return HttpResponse::Unauthorized().finish();
    }

    if req.path().starts_with("/jira-linkfail") {
        return HttpResponse::InternalServerError().body("link service unavailable");
    }

    HttpResponse::Created().finish()
}

/// Starts a server with audit pages, link targets and a fake tracker API.
///
/// Tracker endpoints live under `/jira`, `/jira-linkfail` and `/jira-reject`.
pub async fn start_test_server() -> TestServer {
    let requests: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let data = web::Data::new(requests.clone());

    let http_server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .route(
                "/good.html",
                web::get().to(|| async {
                    HttpResponse::Ok()
                        .content_type("text/html; charset=utf-8")
                        .body(good_page())
                }),
            )
            .route(
                "/bad.html",
                web::get().to(|| async {
                    HttpResponse::Ok()
                        .content_type("text/html; charset=utf-8")
                        .body(BAD_PAGE)
                }),
            )
            .service(web::resource("/ok").to(|| async { HttpResponse::Ok().body("OK") }))
            .service(
                web::resource("/not-found")
                    .to(|| async { HttpResponse::NotFound().body("Not Found") }),
            )
            .service(
                web::resource("/server-error")
                    .to(|| async { HttpResponse::InternalServerError().body("Error") }),
            )
            .service(web::resource("/redirect").to(|| async {
                HttpResponse::Found()
                    .append_header(("Location", "/ok"))
                    .finish()
            }))
            .route(
                "/{tracker}/rest/api/2/issue",
                web::post().to(create_issue),
            )
            .route(
                "/{tracker}/rest/api/2/issueLink",
                web::post().to(create_link),
            )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind test server");

    let addr = http_server
        .addrs()
        .first()
        .cloned()
        .expect("No address bound");
    let url = format!("http://{}", addr);

    let app_server = http_server.run();

    tokio::spawn(async move {
        if let Err(e) = app_server.await {
            eprintln!("Test server error: {}", e);
        }
    });

    TestServer { url, requests }
}
