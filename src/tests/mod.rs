use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::form::{RecordForm, SUBMIT_LABEL};
use crate::record::{Field, Mood, Score};
use crate::render::{ListView, MemorySurface, EMPTY_NOTICE, SHEET_UNAVAILABLE_NOTICE};
use crate::session::{Session, SubmitError};
use crate::store::{ErrorKind, RecordStore, StoreError, StoreOptions};

fn store_for(server: &MockServer) -> RecordStore {
    RecordStore::new(&StoreOptions {
        endpoint: format!("{}/exec", server.uri()),
        timeout_seconds: Some(5),
    })
    .unwrap()
}

fn session_for(server: &MockServer) -> Session<MemorySurface> {
    Session::new(store_for(server), MemorySurface::default())
}

async fn mount_get(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/exec"))
        .respond_with(response)
        .mount(server)
        .await;
}

fn filled_form() -> RecordForm {
    RecordForm {
        score: Score::new(90).unwrap(),
        mood: Mood::Joy,
        word: "성실".to_string(),
        summary: "오늘 배운 것".to_string(),
        praise: "잘했어".to_string(),
        helpful: "친구".to_string(),
        nickname: "minsu".to_string(),
        ..RecordForm::default()
    }
}

#[tokio::test]
async fn fetch_all_decodes_records() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        ResponseTemplate::new(200).set_body_json(json!([
            {"Timestamp": "2024-05-01T09:00:00.000Z", "Nickname": "a", "Score": 80, "Mood": "보통"},
            {"Timestamp": "2024-05-02T09:00:00.000Z", "Nickname": "b", "Score": 90}
        ])),
    )
    .await;

    let records = store_for(&server).fetch_all().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].text(Field::Nickname), "a");
    assert_eq!(records[1].text(Field::Mood), "");
}

#[tokio::test]
async fn fetch_all_rejects_non_list_bodies() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"rows": []})),
    )
    .await;

    let err = store_for(&server).fetch_all().await.unwrap_err();
    assert!(matches!(err, StoreError::NotAList { found: "an object" }));
    assert_eq!(err.kind(), ErrorKind::Protocol);
}

#[tokio::test]
async fn fetch_all_maps_error_object_to_sheet_unavailable() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({"status": "error", "message": "Sheet not found"})),
    )
    .await;

    let err = store_for(&server).fetch_all().await.unwrap_err();
    assert!(matches!(&err, StoreError::SheetUnavailable { message } if message == "Sheet not found"));
    assert!(err.is_sheet_unavailable());
    assert_eq!(err.kind(), ErrorKind::Protocol);
}

#[tokio::test]
async fn fetch_all_fails_on_bad_status_and_bad_json() {
    let server = MockServer::start().await;
    mount_get(&server, ResponseTemplate::new(500).set_body_string("boom")).await;
    let err = store_for(&server).fetch_all().await.unwrap_err();
    assert!(matches!(err, StoreError::Status { status: 500, .. }));
    assert_eq!(err.kind(), ErrorKind::Protocol);

    let server = MockServer::start().await;
    mount_get(
        &server,
        ResponseTemplate::new(200).set_body_string("<html>login</html>"),
    )
    .await;
    let err = store_for(&server).fetch_all().await.unwrap_err();
    assert!(matches!(err, StoreError::Decode { .. }));
    assert_eq!(err.kind(), ErrorKind::Protocol);
}

#[tokio::test]
async fn fetch_all_rejects_non_object_items() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        ResponseTemplate::new(200).set_body_json(json!([{"Nickname": "a"}, 42])),
    )
    .await;

    let err = store_for(&server).fetch_all().await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidRecord { index: 1, .. }));
}

#[tokio::test]
async fn unreachable_store_is_a_network_error() {
    let store = RecordStore::new(&StoreOptions {
        endpoint: "http://127.0.0.1:1/exec".to_string(),
        timeout_seconds: Some(5),
    })
    .unwrap();
    let err = store.fetch_all().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn append_posts_json_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/exec"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "score": "90",
            "mood": "기쁨",
            "word": "성실",
            "summary": "오늘 배운 것",
            "praise": "잘했어",
            "helpful": "친구",
            "nickname": "minsu"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    let ack = store_for(&server)
        .append(&filled_form().payload())
        .await
        .unwrap();
    assert_eq!(ack.body, json!({"status": "success"}));
}

#[tokio::test]
async fn append_reports_error_inside_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "error", "message": "quota exceeded"})),
        )
        .mount(&server)
        .await;

    let err = store_for(&server)
        .append(&filled_form().payload())
        .await
        .unwrap_err();
    assert!(matches!(&err, StoreError::Remote { message } if message == "quota exceeded"));
    assert_eq!(err.kind(), ErrorKind::Remote);
}

#[tokio::test]
async fn load_sorts_caches_and_renders_newest_first() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        ResponseTemplate::new(200).set_body_json(json!([
            {"Timestamp": "2024-05-01T09:00:00.000Z", "Nickname": "old", "Score": 80, "Mood": "편안"},
            {"Timestamp": "2024-05-03T09:00:00.000Z", "Nickname": "new", "Score": 90, "Mood": "알수없음"},
            {"Timestamp": "2024-05-02T09:00:00.000Z", "Nickname": "mid", "Score": 70}
        ])),
    )
    .await;

    let mut session = session_for(&server);
    assert!(session.records().is_empty());
    session.load().await;

    let cached: Vec<String> = session
        .records()
        .iter()
        .map(|r| r.text(Field::Nickname))
        .collect();
    assert_eq!(cached, vec!["new", "mid", "old"]);

    let presented = &session.surface().presented;
    assert_eq!(presented.first(), Some(&ListView::Loading));
    let ListView::Rows(rows) = session.view() else {
        panic!("expected rows, got {:?}", session.view());
    };
    assert_eq!(rows[0].nickname, "new");
    assert_eq!(rows[0].mood, "알수없음");
    assert_eq!(rows[2].mood, "😌");
}

#[tokio::test]
async fn load_of_empty_store_shows_empty_notice() {
    let server = MockServer::start().await;
    mount_get(&server, ResponseTemplate::new(200).set_body_json(json!([]))).await;

    let mut session = session_for(&server);
    session.load().await;
    assert_eq!(session.view(), &ListView::Empty);
    assert_eq!(session.view().notice(), Some(EMPTY_NOTICE));
}

#[tokio::test]
async fn load_failure_renders_notice_and_keeps_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"Nickname": "kept", "Score": 90}])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    session.load().await;
    assert_eq!(session.records().len(), 1);

    session.load().await;
    let ListView::Error(message) = session.view() else {
        panic!("expected error notice, got {:?}", session.view());
    };
    assert!(message.starts_with("데이터 로드 실패"));
    assert_eq!(session.records()[0].text(Field::Nickname), "kept");
}

#[tokio::test]
async fn missing_sheet_gets_the_sheet_notice() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({"status": "error", "message": "Sheet not found"})),
    )
    .await;

    let mut session = session_for(&server);
    session.load().await;
    assert_eq!(
        session.view(),
        &ListView::Error(SHEET_UNAVAILABLE_NOTICE.to_string())
    );
}

#[tokio::test]
async fn submit_refetches_instead_of_inserting_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;
    // The store has not caught up yet: the fetch omits the new record.
    mount_get(&server, ResponseTemplate::new(200).set_body_json(json!([]))).await;

    let mut session = session_for(&server);
    let mut form = filled_form();
    session.submit(&mut form).await.unwrap();

    assert!(session.records().is_empty());
    assert_eq!(session.view(), &ListView::Empty);
    assert_eq!(form.mood, Mood::Calm);
    assert!(form.nickname.is_empty());
    assert!(!form.control.is_disabled());
    assert_eq!(form.control.label(), SUBMIT_LABEL);
}

#[tokio::test]
async fn submit_reflects_the_fetch_exactly() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "ok"})))
        .mount(&server)
        .await;
    mount_get(
        &server,
        ResponseTemplate::new(200).set_body_json(json!([
            {"Timestamp": "2024-05-03T09:00:00.000Z", "Nickname": "someone else", "Score": 50}
        ])),
    )
    .await;

    let mut session = session_for(&server);
    session.submit(&mut filled_form()).await.unwrap();

    let ListView::Rows(rows) = session.view() else {
        panic!("expected rows");
    };
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].nickname, "someone else");
}

#[tokio::test]
async fn failed_submit_keeps_form_values() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    let mut form = filled_form();
    let err = session.submit(&mut form).await.unwrap_err();

    assert!(matches!(err, SubmitError::Store { .. }));
    assert!(err.alert().starts_with("❌ 기록 저장에 실패했습니다."));
    assert_eq!(form.mood, Mood::Joy);
    assert_eq!(form.nickname, "minsu");
    assert!(!form.control.is_disabled());
}

#[tokio::test]
async fn submit_is_refused_while_control_is_busy() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    let mut form = filled_form();
    assert!(form.control.try_begin());
    let err = session.submit(&mut form).await.unwrap_err();
    assert!(matches!(err, SubmitError::InFlight));
}

#[tokio::test]
async fn export_reads_only_the_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Timestamp": "2024-05-02T09:00:00.000Z", "Nickname": "a", "Score": 90},
            {"Timestamp": "2024-05-01T09:00:00.000Z", "Nickname": "b"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&server);

    // Nothing loaded yet: the guard fires and no file appears.
    let outcome = session.export(dir.path()).unwrap();
    assert_eq!(outcome, crate::export::ExportOutcome::NothingToExport);

    session.load().await;
    let outcome = session.export(dir.path()).unwrap();
    assert_eq!(
        outcome,
        crate::export::ExportOutcome::Written {
            path: dir.path().join(crate::export::EXPORT_FILE_NAME),
            rows: 1,
        }
    );
}

#[tokio::test]
async fn fresh_session_shows_empty_notice() {
    let server = MockServer::start().await;
    let session = session_for(&server);
    assert!(session.records().is_empty());
    assert_eq!(session.view().notice(), Some(EMPTY_NOTICE));
}
