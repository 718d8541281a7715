use std::sync::Arc;

use serde_json::json;
use sitedesk_api::config::AppConfig;
use sitedesk_api::state::{AppState, Stores};
use sitedesk_client::{ClientConfig, ClientError, HttpContentStore, SiteClient};
use sitedesk_core::auth::hash_password;
use sitedesk_core::content::clients::{ClientCase, ClientsPage};
use sitedesk_core::content::footer::Footer;
use sitedesk_core::content::leads::{LeadPatch, LeadStatus, NewContactSubmission};
use sitedesk_core::content::modules::{ModulePage, ModulesPage};
use sitedesk_core::content::settings::SiteSettings;
use sitedesk_core::content::snippets::{Snippet, SnippetLocation, SnippetSet};
use sitedesk_core::document::ContentKind;
use sitedesk_core::events::{EventBus, SiteEvent};
use sitedesk_core::mutation::PatchOperations;
use sitedesk_core::seo::Rating;
use sitedesk_core::store::{ContentRepository, StoreError};

const PASSWORD: &str = "let-me-in";

struct TestApp {
    client: SiteClient,
    events: tokio::sync::broadcast::Receiver<SiteEvent>,
}

async fn spawn_app() -> TestApp {
    let config = AppConfig {
        jwt_secret: "integration-secret".to_string(),
        admin_password_hash: Some(hash_password(PASSWORD).unwrap()),
        ..AppConfig::default()
    };
    let bus = EventBus::new(64);
    let events = bus.subscribe();
    let state = AppState::new(Stores::memory(), config, bus);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, sitedesk_api::app(state)).await.unwrap();
    });

    let client = SiteClient::new(ClientConfig::new(format!("http://{addr}"))).unwrap();
    TestApp { client, events }
}

async fn admin(app: &TestApp) -> SiteClient {
    let mut client = app.client.clone();
    client.login(PASSWORD).await.unwrap();
    client
}

fn settings(name: &str) -> SiteSettings {
    let mut s = SiteSettings::default();
    s.general.site_name = name.to_string();
    s
}

fn form(name: &str, email: &str) -> NewContactSubmission {
    NewContactSubmission {
        name: name.to_string(),
        email: email.to_string(),
        message: "We need a new ERP".to_string(),
        ..NewContactSubmission::default()
    }
}

#[tokio::test]
async fn health_and_ping() {
    let app = spawn_app().await;
    let health = app.client.health().await.unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["store"], "memory");
}

#[tokio::test]
async fn admin_routes_need_a_token() {
    let app = spawn_app().await;
    let err = app.client.list_leads(&[]).await.unwrap_err();
    assert_eq!(err.status(), Some(401));

    let mut client = app.client.clone();
    let err = client.login("wrong").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn typed_content_round_trip_and_conflicts() {
    let app = spawn_app().await;
    let client = admin(&app).await;

    assert_eq!(client.load::<SiteSettings>().await.unwrap(), SiteSettings::default());

    let saved = client.save(&settings("Northwind Digital")).await.unwrap();
    assert_eq!(saved.kind, ContentKind::Settings);
    assert_eq!(
        client.load::<SiteSettings>().await.unwrap().general.site_name,
        "Northwind Digital"
    );

    let stale = saved.revision.clone();
    client.save(&settings("Second")).await.unwrap();
    let err = client
        .save_content(
            &ContentKind::Settings,
            "Site Settings",
            serde_json::to_value(settings("Third")).unwrap(),
            Some(&stale),
        )
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(409));

    let err = client.save(&SiteSettings::default()).await.unwrap_err();
    assert_eq!(err.status(), Some(422));
}

#[tokio::test]
async fn patching_nested_footer_fields() {
    let mut app = spawn_app().await;
    let client = admin(&app).await;
    client.save(&Footer::default()).await.unwrap();

    let ops = PatchOperations::default().set_path("companyInfo.contact.phone.text", json!("+39 02 1234"));
    let doc = client.patch_content(&ContentKind::Footer, &ops).await.unwrap();
    assert_eq!(doc.content["companyInfo"]["contact"]["phone"]["text"], "+39 02 1234");

    let footer = client.load::<Footer>().await.unwrap();
    assert_eq!(footer.company_info.contact.phone.text, "+39 02 1234");

    let bad = PatchOperations::default().set_path("copyright.year", json!(2024));
    assert_eq!(
        client.patch_content(&ContentKind::Footer, &bad).await.unwrap_err().status(),
        Some(400)
    );

    let mut operations = Vec::new();
    while let Ok(event) = app.events.try_recv() {
        if let SiteEvent::ContentSaved(saved) = event {
            operations.push(saved.operation);
        }
    }
    assert_eq!(operations, ["create", "patch"]);
}

#[tokio::test]
async fn client_cases_are_validated_on_save() {
    let app = spawn_app().await;
    let client = admin(&app).await;
    let case = |slug: &str| ClientCase {
        name: "Acme".to_string(),
        slug: slug.to_string(),
        ..ClientCase::default()
    };
    let page = ClientsPage {
        client_cases: vec![case("acme"), case("acme")],
        ..ClientsPage::default()
    };
    let err = client.save(&page).await.unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert!(matches!(err, ClientError::Api { ref message, .. } if message.contains("duplicate")));
}

#[tokio::test]
async fn lead_lifecycle_and_export() {
    let app = spawn_app().await;
    let ada = app.client.submit_contact(&form("Ada", "ada@example.com")).await.unwrap();
    let bob = app.client.submit_contact(&form("Bob, Jr.", "bob@example.com")).await.unwrap();
    let err = app.client.submit_contact(&form("Eve", "not-an-email")).await.unwrap_err();
    assert_eq!(err.status(), Some(422));

    let client = admin(&app).await;
    let results = client.bulk_update_status(&[ada, bob], LeadStatus::Contacted).await;
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].0, ada);
    assert!(results.iter().all(|(_, r)| r.is_ok()));

    let converted = client
        .update_lead(ada, &LeadPatch::status(LeadStatus::Converted))
        .await
        .unwrap();
    assert_eq!(converted.status, LeadStatus::Converted);

    let listing = client.list_leads(&[("status", "contacted")]).await.unwrap();
    assert_eq!(listing.total, 1);
    assert_eq!(listing.items[0].id, bob);
    let again = client.list_leads(&[("status", "contacted")]).await.unwrap();
    assert_eq!(again.items, listing.items);

    let summary = client.lead_summary().await.unwrap();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.conversion_rate, 50.0);

    let export = client.export_leads(&[("status", "contacted")]).await.unwrap();
    let filename = export.filename.unwrap();
    assert!(filename.starts_with("leads_export_") && filename.ends_with(".csv"));
    let lines: Vec<&str> = export.body.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("id,name,email,"));
    assert!(lines[1].contains("\"Bob, Jr.\""));
}

#[tokio::test]
async fn tracking_feeds_dashboard() {
    let app = spawn_app().await;
    for path in ["/", "/", "/", "/clients"] {
        app.client.track_page_view(path).await.unwrap();
    }
    app.client.track_button_click("cta-demo", "/").await.unwrap();
    assert_eq!(app.client.track_page_view(" ").await.unwrap_err().status(), Some(400));

    let client = admin(&app).await;
    let views = client.page_views().await.unwrap();
    assert_eq!(views.total, 4);
    assert_eq!(views.pages[0].path, "/");
    assert_eq!(views.pages[0].percentage, 75.0);

    let clicks = client.button_clicks().await.unwrap();
    assert_eq!(clicks.total, 1);
    assert_eq!(clicks.buttons[0].percentage, 100.0);
}

#[tokio::test]
async fn public_page_data() {
    let app = spawn_app().await;
    let client = admin(&app).await;

    client
        .save(&ModulesPage {
            modules: vec![ModulePage {
                slug: "crm".to_string(),
                title: "CRM Module".to_string(),
                summary: "Pipeline and contacts".to_string(),
                ..ModulePage::default()
            }],
        })
        .await
        .unwrap();
    let meta = app.client.module_metadata("crm").await.unwrap();
    assert_eq!(meta.title, "CRM Module");
    assert!(app.client.module_metadata("erp").await.unwrap_err().is_not_found());

    client
        .save(&ClientsPage {
            client_cases: vec![ClientCase {
                name: "Borealis".to_string(),
                slug: "borealis".to_string(),
                ..ClientCase::default()
            }],
            ..ClientsPage::default()
        })
        .await
        .unwrap();
    assert_eq!(app.client.client_case("borealis").await.unwrap().name, "Borealis");

    let snippet = |title: &str, priority: i32| Snippet {
        title: title.to_string(),
        content: format!("<!-- {title} -->"),
        location: SnippetLocation::Head,
        is_active: true,
        priority,
        ..Snippet::default()
    };
    client
        .save(&SnippetSet {
            snippets: vec![snippet("analytics", 1), snippet("consent", 10)],
        })
        .await
        .unwrap();
    let head = app.client.snippets("/clients", SnippetLocation::Head).await.unwrap();
    let titles: Vec<&str> = head.snippets.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, ["consent", "analytics"]);
    assert_eq!(head.html, "<!-- consent -->\n<!-- analytics -->");
}

#[tokio::test]
async fn seo_analysis_endpoint() {
    let app = spawn_app().await;
    let analysis = app
        .client
        .analyze_seo("title", "test test test test", "test", "")
        .await
        .unwrap();
    let density = analysis
        .assessments
        .iter()
        .find(|a| a.identifier == "keywordDensity")
        .unwrap();
    assert_eq!(density.score, Rating::Bad);
}

#[tokio::test]
async fn repository_over_http_store() {
    let app = spawn_app().await;
    let client = admin(&app).await;
    let store = Arc::new(HttpContentStore::new(client));
    let repo = ContentRepository::<SiteSettings>::new(store.clone());
    repo.save(settings("Over HTTP")).await.unwrap();
    assert_eq!(repo.load().await.unwrap().general.site_name, "Over HTTP");

    let other = ContentRepository::<SiteSettings>::new(store);
    assert_eq!(other.load().await.unwrap().general.site_name, "Over HTTP");
    other.save(settings("Changed")).await.unwrap();
    assert!(matches!(
        repo.save(settings("Stale")).await,
        Err(StoreError::Conflict { .. })
    ));
}
