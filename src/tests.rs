//! Integration tests: the stores and controllers against an in-process catalogue server.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tempfile::TempDir;

use crate::auth::{FileTokenStore, MemoryTokenStore, TokenStore};
use crate::config::Config;
use crate::detail::{DetailMode, DetailTarget, SaveOutcome};
use crate::errors::ClientError;
use crate::listing::{FilterMode, ListQuery};
use crate::models::{
    CountryPayload, ItemPayload, ItemType, PartnerPayload, PartnerType, StatusField,
};
use crate::ui::{ConfirmOutcome, ScriptedConfirm, Severity};
use crate::AppContext;

/// In-memory catalogue keyed by resource path.
#[derive(Default)]
struct Catalogue {
    collections: HashMap<String, Vec<Value>>,
    token: Option<String>,
    requests: Vec<String>,
    next_id: u64,
}

type Shared = Arc<Mutex<Catalogue>>;

#[derive(Deserialize)]
struct PageParams {
    page: Option<usize>,
    per_page: Option<usize>,
}

fn error(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, json!({ "message": "Not found." }))
}

/// Record the request and check the bearer token.
fn enter(state: &Shared, headers: &HeaderMap, line: String) -> Result<(), Response> {
    let mut catalogue = state.lock().unwrap();
    catalogue.requests.push(line);
    let Some(expected) = catalogue.token.clone() else {
        return Ok(());
    };
    let presented = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    if presented == Some(expected.as_str()) {
        Ok(())
    } else {
        Err(error(
            StatusCode::UNAUTHORIZED,
            json!({ "message": "Unauthenticated." }),
        ))
    }
}

/// Resolve `*_id` keys into embedded records and expand bare dates.
fn hydrate(catalogue: &Catalogue, record: &mut Map<String, Value>) {
    let relations = [
        ("context_id", "context"),
        ("language_id", "language"),
        ("country_id", "country"),
        ("partner_id", "partner"),
        ("project_id", "project"),
    ];
    for (key, target) in relations {
        if let Some(id) = record.get(key).cloned() {
            let embedded = id
                .as_str()
                .and_then(|id| {
                    catalogue
                        .collections
                        .get(target)
                        .and_then(|items| items.iter().find(|item| item["id"] == id))
                })
                .cloned()
                .unwrap_or(Value::Null);
            record.insert(target.to_string(), embedded);
        }
    }
    let expanded = match record.get("launch_date") {
        Some(Value::String(date)) if date.len() == 10 => Some(format!("{date}T00:00:00.000000Z")),
        _ => None,
    };
    if let Some(date) = expanded {
        record.insert("launch_date".into(), Value::String(date));
    }
}

fn validate(
    catalogue: &Catalogue,
    resource: &str,
    body: &Map<String, Value>,
    creating: bool,
) -> Result<(), Response> {
    let mut errors = Map::new();
    if body
        .get("internal_name")
        .and_then(Value::as_str)
        .map_or(true, str::is_empty)
    {
        errors.insert(
            "internal_name".into(),
            json!(["The internal name field is required."]),
        );
    }
    if creating {
        if let Some(id) = body.get("id") {
            let taken = catalogue
                .collections
                .get(resource)
                .is_some_and(|items| items.iter().any(|item| &item["id"] == id));
            if taken {
                errors.insert("id".into(), json!(["The id has already been taken."]));
            }
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(error(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "message": "The given data was invalid.", "errors": errors }),
        ))
    }
}

async fn list(
    State(state): State<Shared>,
    Path(resource): Path<String>,
    Query(params): Query<PageParams>,
    headers: HeaderMap,
) -> Response {
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(15).max(1);
    if let Err(rejection) = enter(&state, &headers, format!("GET /{resource}?page={page}&per_page={per_page}")) {
        return rejection;
    }

    let catalogue = state.lock().unwrap();
    let items = catalogue.collections.get(&resource).cloned().unwrap_or_default();
    let last_page = items.len().div_ceil(per_page).max(1);
    let data: Vec<Value> = items
        .iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .cloned()
        .collect();

    Json(json!({
        "data": data,
        "meta": {
            "current_page": page,
            "last_page": last_page,
            "per_page": per_page,
            "total": items.len(),
            "links": [
                { "url": null, "label": "&laquo; Previous", "active": false },
                { "url": format!("/{resource}?page={page}"), "label": page.to_string(), "active": true },
                { "url": null, "label": "Next &raquo;", "active": false }
            ]
        },
        "links": { "first": null, "last": null, "prev": null, "next": null }
    }))
    .into_response()
}

async fn create(
    State(state): State<Shared>,
    Path(resource): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Map<String, Value>>,
) -> Response {
    if let Err(rejection) = enter(&state, &headers, format!("POST /{resource}")) {
        return rejection;
    }

    let mut catalogue = state.lock().unwrap();
    if let Err(rejection) = validate(&catalogue, &resource, &body, true) {
        return rejection;
    }
    catalogue.next_id += 1;
    let mut record = body;
    if !record.contains_key("id") {
        let id = format!("{resource}-{}", catalogue.next_id);
        record.insert("id".into(), Value::String(id));
    }
    record.insert("created_at".into(), json!("2024-06-01T12:00:00.000000Z"));
    hydrate(&catalogue, &mut record);

    let record = Value::Object(record);
    catalogue
        .collections
        .entry(resource)
        .or_default()
        .push(record.clone());
    (StatusCode::CREATED, Json(json!({ "data": record }))).into_response()
}

async fn show(
    State(state): State<Shared>,
    Path((resource, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejection) = enter(&state, &headers, format!("GET /{resource}/{id}")) {
        return rejection;
    }

    let catalogue = state.lock().unwrap();
    let items = catalogue.collections.get(&resource).cloned().unwrap_or_default();
    match id.as_str() {
        "default" => match items.iter().find(|item| item["is_default"] == true) {
            Some(item) => Json(json!({ "data": item })).into_response(),
            None => not_found(),
        },
        "enabled" => {
            let data: Vec<&Value> = items
                .iter()
                .filter(|item| item["is_enabled"] == true && item["is_launched"] == true)
                .collect();
            Json(json!({ "data": data })).into_response()
        }
        _ => match items.iter().find(|item| item["id"] == id.as_str()) {
            Some(item) => Json(json!({ "data": item })).into_response(),
            None => not_found(),
        },
    }
}

async fn update(
    State(state): State<Shared>,
    Path((resource, id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Map<String, Value>>,
) -> Response {
    if let Err(rejection) = enter(&state, &headers, format!("PUT /{resource}/{id}")) {
        return rejection;
    }

    let mut catalogue = state.lock().unwrap();
    if let Err(rejection) = validate(&catalogue, &resource, &body, false) {
        return rejection;
    }
    let Some(existing) = catalogue
        .collections
        .get(&resource)
        .and_then(|items| items.iter().find(|item| item["id"] == id.as_str()))
        .cloned()
    else {
        return not_found();
    };

    let mut record = existing.as_object().cloned().unwrap_or_default();
    record.extend(body);
    record.insert("updated_at".into(), json!("2024-06-02T12:00:00.000000Z"));
    hydrate(&catalogue, &mut record);
    let record = Value::Object(record);

    if let Some(items) = catalogue.collections.get_mut(&resource) {
        for item in items.iter_mut().filter(|item| item["id"] == id.as_str()) {
            *item = record.clone();
        }
    }
    Json(json!({ "data": record })).into_response()
}

async fn destroy(
    State(state): State<Shared>,
    Path((resource, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejection) = enter(&state, &headers, format!("DELETE /{resource}/{id}")) {
        return rejection;
    }

    let mut catalogue = state.lock().unwrap();
    let Some(items) = catalogue.collections.get_mut(&resource) else {
        return not_found();
    };
    let before = items.len();
    items.retain(|item| item["id"] != id.as_str());
    if items.len() == before {
        return not_found();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn flag(
    State(state): State<Shared>,
    Path((resource, id, action)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<Map<String, Value>>,
) -> Response {
    if let Err(rejection) = enter(&state, &headers, format!("PATCH /{resource}/{id}/{action}")) {
        return rejection;
    }

    let key = match action.as_str() {
        "default" => "is_default",
        "set-enabled" => "is_enabled",
        "set-launched" => "is_launched",
        _ => return not_found(),
    };
    let Some(value) = body.get(key).and_then(Value::as_bool) else {
        return error(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "message": format!("The {key} field is required.") }),
        );
    };

    let mut catalogue = state.lock().unwrap();
    let Some(items) = catalogue.collections.get_mut(&resource) else {
        return not_found();
    };
    if !items.iter().any(|item| item["id"] == id.as_str()) {
        return not_found();
    }
    // Contexts have a single default; languages may have several
    let single_default = key == "is_default" && resource == "context" && value;
    let mut updated = Value::Null;
    for item in items.iter_mut() {
        if item["id"] == id.as_str() {
            item[key] = Value::Bool(value);
            updated = item.clone();
        } else if single_default {
            item[key] = Value::Bool(false);
        }
    }
    Json(json!({ "data": updated })).into_response()
}

/// Test fixture: a catalogue server on a random port and an app context pointed at it.
struct TestFixture {
    catalogue: Shared,
    app: Arc<AppContext>,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new(seed: HashMap<&str, Vec<Value>>) -> Self {
        Self::with_token(seed, None).await
    }

    async fn with_token(seed: HashMap<&str, Vec<Value>>, token: Option<&str>) -> Self {
        let catalogue = Catalogue {
            collections: seed
                .into_iter()
                .map(|(path, items)| (path.to_string(), items))
                .collect(),
            token: token.map(str::to_string),
            ..Catalogue::default()
        };
        let catalogue: Shared = Arc::new(Mutex::new(catalogue));

        let api = Router::new()
            .route("/{resource}", get(list).post(create))
            .route("/{resource}/{id}", get(show).put(update).delete(destroy))
            .route("/{resource}/{id}/{action}", patch(flag))
            .with_state(catalogue.clone());
        let app = Router::new().nest("/api", api);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = Config {
            token_path: temp_dir.path().join("auth.json"),
            ..Config::default().with_base_url(format!("http://{}/api", addr))
        };
        let tokens = FileTokenStore::new(&config.token_path);
        if let Some(token) = token {
            tokens.save(token).unwrap();
        }

        TestFixture {
            catalogue,
            app: Arc::new(AppContext::new(config, Arc::new(tokens)).unwrap()),
            _temp_dir: temp_dir,
        }
    }

    fn requests(&self) -> Vec<String> {
        self.catalogue.lock().unwrap().requests.clone()
    }

    fn stored(&self, resource: &str) -> Vec<Value> {
        self.catalogue
            .lock()
            .unwrap()
            .collections
            .get(resource)
            .cloned()
            .unwrap_or_default()
    }
}

fn seed(entries: Vec<(&'static str, Vec<Value>)>) -> HashMap<&'static str, Vec<Value>> {
    entries.into_iter().collect()
}

fn countries(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| json!({ "id": format!("C{i:03}"), "internal_name": format!("Country {:03}", count - 1 - i) }))
        .collect()
}

#[tokio::test]
async fn test_fetch_all_requests_exactly_three_pages() {
    let fixture = TestFixture::new(seed(vec![("country", countries(300))])).await;

    let all = fixture.app.countries().fetch_all().await.unwrap();

    assert_eq!(all.len(), 300);
    assert_eq!(
        fixture.requests(),
        vec![
            "GET /country?page=1&per_page=100",
            "GET /country?page=2&per_page=100",
            "GET /country?page=3&per_page=100",
        ]
    );
    assert!(all
        .windows(2)
        .all(|pair| pair[0].internal_name <= pair[1].internal_name));
    assert!(fixture.app.countries().is_loaded());
}

#[tokio::test]
async fn test_fetch_page_reads_pagination_metadata() {
    let fixture = TestFixture::new(seed(vec![("country", countries(40))])).await;

    let page = fixture
        .app
        .countries()
        .fetch_page(Some(2), Some(15))
        .await
        .unwrap();

    assert_eq!(page.len(), 15);
    let meta = fixture.app.countries().page_meta().unwrap();
    assert_eq!((meta.current_page, meta.last_page), (2, 3));
    assert_eq!(meta.page_links().count(), 1);
}

#[tokio::test]
async fn test_create_country_scenario() {
    let fixture = TestFixture::new(seed(vec![("country", countries(2))])).await;
    let store = fixture.app.countries();
    store.fetch_page(None, None).await.unwrap();

    let created = store
        .create(&CountryPayload {
            id: "GBR".into(),
            internal_name: "United Kingdom".into(),
            backward_compatibility: Some("GB".into()),
        })
        .await
        .unwrap();

    assert_eq!(created.id, "GBR");
    assert_eq!(store.items().len(), 3);
    assert!(store
        .items()
        .iter()
        .any(|country| country.internal_name == "United Kingdom"));
    assert_eq!(fixture.stored("country").len(), 3);
}

#[tokio::test]
async fn test_validation_failure_exposes_field_errors() {
    let fixture = TestFixture::new(seed(vec![("country", countries(1))])).await;

    let err = fixture
        .app
        .countries()
        .create(&CountryPayload {
            id: "C000".into(),
            internal_name: String::new(),
            backward_compatibility: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Validation { .. }));
    assert_eq!(
        fixture.app.countries().error().as_deref(),
        Some("Failed to create country")
    );
    let fields: Vec<String> = fixture
        .app
        .errors()
        .field_errors()
        .into_iter()
        .map(|e| e.field)
        .collect();
    assert_eq!(fields, vec!["id", "internal_name"]);
}

#[tokio::test]
async fn test_delete_of_missing_item_returns_false() {
    let fixture = TestFixture::new(seed(vec![("country", countries(1))])).await;

    assert!(!fixture.app.countries().delete("XXX").await);
    assert_eq!(
        fixture.app.countries().error().as_deref(),
        Some("Failed to delete country")
    );
    assert!(fixture.app.countries().delete("C000").await);
    assert!(fixture.stored("country").is_empty());
}

#[tokio::test]
async fn test_bearer_token_is_read_per_request() {
    let fixture = TestFixture::with_token(seed(vec![("country", countries(1))]), Some("1|secret")).await;
    let store = fixture.app.countries();

    store.fetch_page(None, None).await.unwrap();
    assert!(fixture.app.auth().is_authenticated());

    // A token change is picked up by the next request
    fixture.app.auth().set_token("stale").unwrap();
    let err = store.fetch_page(None, None).await.unwrap_err();

    assert!(err.is_auth_failure());
    assert_eq!(store.error().as_deref(), Some("Failed to fetch countries"));
    assert!(store.items().is_empty());
    // The error handler forgets a rejected token
    assert!(!fixture.app.auth().is_authenticated());
}

#[tokio::test]
async fn test_missing_token_omits_header() {
    let fixture = TestFixture::with_token(seed(vec![]), Some("1|secret")).await;
    fixture.app.auth().logout().unwrap();

    let err = fixture.app.languages().fetch_all().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(fixture.requests().len(), 1);
}

#[tokio::test]
async fn test_context_default_is_exclusive() {
    let contexts = vec![
        json!({ "id": "ctx-1", "internal_name": "Public", "is_default": true }),
        json!({ "id": "ctx-2", "internal_name": "Staff", "is_default": false }),
        json!({ "id": "ctx-3", "internal_name": "Archive", "is_default": false }),
    ];
    let fixture = TestFixture::new(seed(vec![("context", contexts)])).await;
    let store = fixture.app.contexts();
    store.fetch_all().await.unwrap();

    store.set_default("ctx-3", true).await.unwrap();

    let defaults: Vec<String> = store.default_items().into_iter().map(|c| c.id).collect();
    assert_eq!(defaults, vec!["ctx-3"]);
    assert_eq!(
        fixture.requests().last().map(String::as_str),
        Some("PATCH /context/ctx-3/default")
    );

    let fetched = store.fetch_default().await.unwrap();
    assert_eq!(fetched.id, "ctx-3");
}

#[tokio::test]
async fn test_language_defaults_may_overlap() {
    let languages = vec![
        json!({ "id": "eng", "internal_name": "English", "is_default": true }),
        json!({ "id": "fra", "internal_name": "French", "is_default": false }),
    ];
    let fixture = TestFixture::new(seed(vec![("language", languages)])).await;
    let store = fixture.app.languages();
    store.ensure_loaded().await.unwrap();

    store.set_default("fra", true).await.unwrap();

    assert_eq!(store.default_items().len(), 2);
}

#[tokio::test]
async fn test_partner_round_trips_type_and_country() {
    let fixture = TestFixture::new(seed(vec![(
        "country",
        vec![json!({ "id": "ITA", "internal_name": "Italy" })],
    )]))
    .await;

    let partner = fixture
        .app
        .partners()
        .create(&PartnerPayload {
            internal_name: "Museo Nazionale".into(),
            backward_compatibility: None,
            partner_type: PartnerType::Institution,
            country_id: Some("ITA".into()),
        })
        .await
        .unwrap();

    assert_eq!(partner.partner_type, PartnerType::Institution);
    assert_eq!(partner.country.map(|c| c.internal_name).as_deref(), Some("Italy"));
    assert_eq!(fixture.stored("partner")[0]["type"], "institution");
}

fn project_seed() -> Vec<(&'static str, Vec<Value>)> {
    vec![
        (
            "context",
            vec![json!({ "id": "ctx-1", "internal_name": "Public", "is_default": true })],
        ),
        (
            "language",
            vec![
                json!({ "id": "eng", "internal_name": "English", "is_default": true }),
                json!({ "id": "ita", "internal_name": "Italian", "is_default": false }),
            ],
        ),
        (
            "project",
            vec![
                json!({ "id": "p-1", "internal_name": "Alpha", "is_enabled": true, "is_launched": true,
                        "launch_date": "2023-12-01T00:00:00.000000Z" }),
                json!({ "id": "p-2", "internal_name": "beta", "backward_compatibility": "BT",
                        "is_enabled": true, "is_launched": false }),
                json!({ "id": "p-3", "internal_name": "Gamma", "is_enabled": false, "is_launched": false }),
            ],
        ),
    ]
}

#[tokio::test]
async fn test_project_list_pipeline() {
    let fixture = TestFixture::new(seed(project_seed())).await;
    let store = fixture.app.projects();
    store.fetch_page(None, None).await.unwrap();
    store.fetch_visible().await.unwrap();

    let ids = |query: &ListQuery| -> Vec<String> {
        store.query(query).into_iter().map(|p| p.id).collect()
    };

    assert_eq!(ids(&ListQuery::new()), vec!["p-1", "p-3", "p-2"]);
    assert_eq!(ids(&ListQuery::new().with_mode(FilterMode::Visible)), vec!["p-1"]);
    assert_eq!(ids(&ListQuery::new().with_mode(FilterMode::Enabled)), vec!["p-1", "p-2"]);
    assert_eq!(ids(&ListQuery::new().with_search("bt")), vec!["p-2"]);

    let mut by_date = ListQuery::new();
    by_date.handle_sort("launch_date");
    by_date.handle_sort("launch_date");
    // Projects without a launch date stay last even when descending
    assert_eq!(ids(&by_date)[0], "p-1");
}

#[tokio::test]
async fn test_project_detail_workflow() {
    let fixture = TestFixture::new(seed(project_seed())).await;
    let delete_confirm = Arc::new(ScriptedConfirm::new(ConfirmOutcome::Cancel));
    let mut controller = fixture.app.detail_controller(
        fixture.app.projects(),
        delete_confirm.clone(),
        Arc::new(ScriptedConfirm::always(ConfirmOutcome::Leave)),
    );

    // Create, with defaults taken from the reference stores
    controller.initialize(DetailTarget::New).await.unwrap();
    assert_eq!(controller.mode(), DetailMode::Create);
    assert_eq!(controller.form().context_id, "ctx-1");
    assert_eq!(controller.form().language_id, "eng");

    controller.form_mut().internal_name = "Delta".into();
    controller.form_mut().launch_date = "2024-03-15".into();
    let SaveOutcome::Created(created) = controller.save().await.unwrap() else {
        panic!("expected a created project");
    };
    assert_eq!(created.context.as_ref().map(|c| c.id.as_str()), Some("ctx-1"));
    assert_eq!(created.launch_date.as_deref(), Some("2024-03-15T00:00:00.000000Z"));
    assert_eq!(controller.mode(), DetailMode::View);

    // Edit
    assert!(controller.enter_edit_mode());
    assert_eq!(controller.form().launch_date, "2024-03-15");
    controller.form_mut().language_id = "ita".into();
    assert!(controller.has_unsaved_changes());
    controller.save().await.unwrap();
    assert_eq!(
        controller.current().and_then(|p| p.language).map(|l| l.id),
        Some("ita".to_string())
    );

    // Toggle status
    controller.handle_status_toggle(0).await.unwrap();
    assert_eq!(controller.current().map(|p| p.is_enabled), Some(true));
    assert!(!controller.status_cards()[1].disabled);

    let texts = fixture.app.messages().texts();
    assert_eq!(
        texts,
        vec![
            "Project created successfully.",
            "Project updated successfully.",
            "Project enabled successfully.",
        ]
    );

    // Delete after confirmation
    delete_confirm.push(ConfirmOutcome::Delete);
    let outcome = controller.delete_resource().await.unwrap();
    assert!(outcome.navigate_to_list);
    assert!(fixture
        .stored("project")
        .iter()
        .all(|p| p["id"] != created.id.as_str()));
    assert!(!fixture.app.overlay().is_visible());
    assert_eq!(
        fixture.app.messages().messages().last().map(|m| m.severity),
        Some(Severity::Info)
    );
}

#[tokio::test]
async fn test_launch_toggle_through_http() {
    let fixture = TestFixture::new(seed(project_seed())).await;
    let store = fixture.app.projects();
    store.fetch_one("p-2").await.unwrap();

    let launched = store.set_status("p-2", StatusField::Launched, true).await.unwrap();

    assert!(launched.is_launched);
    assert_eq!(store.current(), Some(launched));
    assert_eq!(
        fixture.requests().last().map(String::as_str),
        Some("PATCH /project/p-2/set-launched")
    );
}

#[tokio::test]
async fn test_logout_forgets_token_and_caches() {
    let fixture = TestFixture::with_token(
        seed(vec![
            ("country", countries(3)),
            ("language", vec![json!({ "id": "eng", "internal_name": "English", "is_default": true })]),
        ]),
        Some("1|secret"),
    )
    .await;
    let app = &fixture.app;
    app.countries().fetch_page(None, None).await.unwrap();
    app.languages().ensure_loaded().await.unwrap();
    app.messages().add(Severity::Info, "Loaded");

    app.logout().unwrap();

    assert!(!app.auth().is_authenticated());
    assert!(app.countries().items().is_empty());
    assert!(app.countries().page_meta().is_none());
    assert!(!app.languages().is_loaded());
    assert!(app.messages().messages().is_empty());

    // Nothing cached any more, so the next read goes back to the server
    let err = app.languages().ensure_loaded().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_item_embeds_partner_and_country() {
    let fixture = TestFixture::new(seed(vec![
        ("country", vec![json!({ "id": "EGY", "internal_name": "Egypt" })]),
        (
            "partner",
            vec![json!({ "id": "pa-1", "internal_name": "Egyptian Museum", "type": "museum" })],
        ),
    ]))
    .await;
    let store = fixture.app.items();

    let payload = ItemPayload {
        internal_name: "Temple of Karnak".into(),
        backward_compatibility: None,
        item_type: ItemType::Monument,
        owner_reference: None,
        mwnf_reference: Some("MWNF-7".into()),
        partner_id: Some("pa-1".into()),
        project_id: None,
        country_id: Some("EGY".into()),
    };
    let created = store.create(&payload).await.unwrap();

    assert_eq!(created.item_type, ItemType::Monument);
    assert_eq!(created.partner.as_ref().map(|p| p.id.as_str()), Some("pa-1"));
    assert_eq!(created.country.as_ref().map(|c| c.internal_name.as_str()), Some("Egypt"));
    assert_eq!(fixture.stored("item")[0]["type"], "monument");
    assert_eq!(fixture.requests().last().map(String::as_str), Some("POST /item"));
}

#[tokio::test]
async fn test_authors_and_workshops_load_sorted() {
    let fixture = TestFixture::new(seed(vec![
        (
            "author",
            vec![
                json!({ "id": "a-1", "name": "Zoé Martin", "internal_name": null }),
                json!({ "id": "a-2", "name": "Émile Durand", "internal_name": null }),
                json!({ "id": "a-3", "name": "Eva Stone", "internal_name": "stone_eva" }),
            ],
        ),
        (
            "workshop",
            vec![
                json!({ "id": "w-1", "name": "Atelier", "internal_name": "atelier" }),
                json!({ "id": "w-2", "name": "Bottega", "internal_name": "Bottega" }),
            ],
        ),
    ]))
    .await;

    let (authors, workshops) = tokio::join!(
        fixture.app.authors().ensure_loaded(),
        fixture.app.workshops().ensure_loaded()
    );

    let authors: Vec<String> = authors.unwrap().into_iter().map(|a| a.id).collect();
    // "Émile" sorts with the E names, ahead of "stone_eva" and "Zoé"
    assert_eq!(authors, vec!["a-2", "a-3", "a-1"]);
    let workshops: Vec<String> = workshops.unwrap().into_iter().map(|w| w.id).collect();
    assert_eq!(workshops, vec!["w-1", "w-2"]);
}

#[tokio::test]
async fn test_memory_token_store_against_open_server() {
    let fixture = TestFixture::new(seed(vec![("glossary", vec![json!({ "id": "g-1", "internal_name": "Fresco" })])])).await;
    let app = AppContext::new(
        fixture.app.config().clone(),
        Arc::new(MemoryTokenStore::new()),
    )
    .unwrap();

    let entries = app.glossary().fetch_all().await.unwrap();
    assert_eq!(entries[0].internal_name, "Fresco");
}
