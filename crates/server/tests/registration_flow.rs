use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::routing::get;
use axum::Router;
use configs::{CursorStep, PetitionConfig};
use sea_orm::{ConnectOptions, Database};
use tower::ServiceExt;

use server::routes;
use server::state::ServerState;
use service::signature::domain::Signature;
use service::signature::repository::{mock::MockSignatureRepository, SeaOrmSignatureRepository, SignatureRepository};
use service::signature::service::PetitionService;

const BASE: &str = "http://localhost:3000";

fn app_with(repo: Arc<dyn SignatureRepository>, cfg: PetitionConfig, login: Router) -> Router {
    let petition = PetitionService::new(repo, cfg, BASE);
    routes::build_router(ServerState::new(petition), login)
}

fn mock_app() -> (Arc<MockSignatureRepository>, Router) {
    let repo = Arc::new(MockSignatureRepository::default());
    let app = app_with(repo.clone(), PetitionConfig::default(), Router::new());
    (repo, app)
}

fn post_form(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get_req(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

async fn body_text(resp: axum::response::Response) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

#[tokio::test]
async fn listing_shows_count_and_self_link() -> anyhow::Result<()> {
    let (_repo, app) = mock_app();
    let resp = app.oneshot(get_req("/?offset=0&limit=10")).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Fjöldi undirskrifta: 0"));
    assert!(html.contains("offset=0&amp;limit=10"));
    assert!(!html.contains("rel=\"prev\""));
    Ok(())
}

#[tokio::test]
async fn malformed_query_falls_back_to_defaults() -> anyhow::Result<()> {
    let (_repo, app) = mock_app();
    let resp = app.oneshot(get_req("/?offset=abc&limit=-4")).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("offset=0&amp;limit=50"));
    Ok(())
}

#[tokio::test]
async fn duplicated_query_key_falls_back_to_defaults() -> anyhow::Result<()> {
    let (_repo, app) = mock_app();
    let resp = app.oneshot(get_req("/?offset=1&offset=2&limit=5")).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("offset=0&amp;limit=50"));
    assert!(!html.contains("duplicate field"));
    Ok(())
}

#[tokio::test]
async fn valid_submission_redirects_home() -> anyhow::Result<()> {
    let (repo, app) = mock_app();
    let resp = app
        .oneshot(post_form("name=J%C3%B3n&nationalId=123456-7890&comment=&anonymous=on"))
        .await?;
    assert!(resp.status().is_redirection());
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");
    let rows = repo.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].national_id, "1234567890");
    assert!(rows[0].anonymous);
    Ok(())
}

#[tokio::test]
async fn invalid_submission_rerenders_with_errors_and_echo() -> anyhow::Result<()> {
    let (repo, app) = mock_app();
    let resp = app.oneshot(post_form("name=&nationalId=12345&comment=hello")).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Nafn má ekki vera tómt"));
    assert!(html.contains("Kennitala verður að vera á formi 000000-0000 eða 0000000000"));
    assert!(html.contains("value=\"12345\""));
    assert!(html.contains(">hello</textarea>"));
    assert!(repo.rows().is_empty());
    Ok(())
}

#[tokio::test]
async fn missing_fields_count_as_empty() -> anyhow::Result<()> {
    let (repo, app) = mock_app();
    let resp = app.oneshot(post_form("")).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Kennitala má ekki vera tóm"));
    assert!(repo.rows().is_empty());
    Ok(())
}

#[tokio::test]
async fn second_signature_with_same_id_gets_error_page() -> anyhow::Result<()> {
    let (repo, app) = mock_app();
    let first = app.clone().oneshot(post_form("name=A&nationalId=1234567890")).await?;
    assert!(first.status().is_redirection());

    let second = app.oneshot(post_form("name=B&nationalId=123456-7890")).await?;
    assert_eq!(second.status(), StatusCode::OK);
    let html = body_text(second).await;
    assert!(html.contains("Gat ekki skráð!"));
    assert!(html.contains("Hafðir þú skrifað undir áður?"));
    assert_eq!(repo.rows().len(), 1);
    Ok(())
}

#[tokio::test]
async fn script_comment_is_stored_inert() -> anyhow::Result<()> {
    let (repo, app) = mock_app();
    let resp = app
        .clone()
        .oneshot(post_form("name=A&nationalId=1234567890&comment=%3Cscript%3Ealert(1)%3C%2Fscript%3E"))
        .await?;
    assert!(resp.status().is_redirection());
    let stored: Vec<Signature> = repo.rows();
    assert!(!stored[0].comment.contains("<script"));

    let html = body_text(app.oneshot(get_req("/")).await?).await;
    assert!(!html.contains("<script"));
    Ok(())
}

#[tokio::test]
async fn entity_split_script_link_loses_its_href() -> anyhow::Result<()> {
    let (repo, app) = mock_app();
    let comment = "%3Ca%20href%3D%22java%26Tab%3Bscript%3Aalert(1)%22%3Ex%3C%2Fa%3E";
    let resp = app
        .clone()
        .oneshot(post_form(&format!("name=A&nationalId=1234567890&comment={comment}")))
        .await?;
    assert!(resp.status().is_redirection());
    assert_eq!(repo.rows()[0].comment, "<a>x</a>");

    let html = body_text(app.oneshot(get_req("/")).await?).await;
    assert!(!html.contains("script:"));
    Ok(())
}

#[tokio::test]
async fn storage_fault_on_listing_hits_error_boundary() -> anyhow::Result<()> {
    let (repo, app) = mock_app();
    repo.fail_with("connection refused: secret-host:5432");
    let resp = app.oneshot(get_req("/")).await?;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let html = body_text(resp).await;
    assert!(html.contains("Villa kom upp"));
    assert!(!html.contains("secret-host"));
    Ok(())
}

#[tokio::test]
async fn storage_fault_on_submit_shows_already_signed_page() -> anyhow::Result<()> {
    let (repo, app) = mock_app();
    repo.fail_with("disk full");
    let resp = app.oneshot(post_form("name=A&nationalId=1234567890")).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Gat ekki skráð!"));
    assert!(!html.contains("disk full"));
    Ok(())
}

#[tokio::test]
async fn unmatched_paths_fall_through_to_login_router() -> anyhow::Result<()> {
    let repo = Arc::new(MockSignatureRepository::default());
    let login = Router::new().route("/login", get(|| async { "login form" }));
    let app = app_with(repo, PetitionConfig::default(), login);

    let resp = app.clone().oneshot(get_req("/login")).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "login form");

    let resp = app.oneshot(get_req("/nowhere")).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn panicking_handler_is_caught() -> anyhow::Result<()> {
    let repo = Arc::new(MockSignatureRepository::default());
    let login = Router::new().route(
        "/boom",
        get(|| async {
            if true {
                panic!("handler exploded");
            }
            "unreachable"
        }),
    );
    let app = app_with(repo, PetitionConfig::default(), login);
    let resp = app.oneshot(get_req("/boom")).await?;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let html = body_text(resp).await;
    assert!(!html.contains("exploded"));
    Ok(())
}

#[tokio::test]
async fn health_endpoint() -> anyhow::Result<()> {
    let (_repo, app) = mock_app();
    let resp = app.oneshot(get_req("/health")).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, r#"{"status":"ok"}"#);
    Ok(())
}

#[tokio::test]
async fn legacy_links_against_sqlite_store() -> anyhow::Result<()> {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_string());
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await?;
    models::db::ensure_schema(&db).await?;
    let repo: Arc<dyn SignatureRepository> = Arc::new(SeaOrmSignatureRepository::new(db, Duration::from_secs(5)));
    let cfg = PetitionConfig { cursor_step: CursorStep::Legacy, ..PetitionConfig::default() };
    let app = app_with(repo.clone(), cfg, Router::new());

    for (name, id) in [("A", "0101010101"), ("B", "0202020202"), ("C", "030303-0303")] {
        let body = format!("name={name}&nationalId={id}");
        let resp = app.clone().oneshot(post_form(&body)).await?;
        assert!(resp.status().is_redirection());
    }
    let dup = app.clone().oneshot(post_form("name=D&nationalId=0303030303")).await?;
    assert!(body_text(dup).await.contains("Gat ekki skráð!"));
    assert_eq!(repo.count().await?, 3);

    let html = body_text(app.oneshot(get_req("/?offset=1&limit=2")).await?).await;
    assert!(html.contains("Fjöldi undirskrifta: 3"));
    assert!(html.contains("rel=\"prev\" href=\"http:&#x2F;&#x2F;localhost:3000&#x2F;?offset=0&amp;limit=2\""));
    assert!(html.contains("rel=\"next\" href=\"http:&#x2F;&#x2F;localhost:3000&#x2F;?offset=2&amp;limit=2\""));
    Ok(())
}
