//! End-to-end tests against a mock gossiper GUI server.

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use peerster_gui::{
    ApiClient, ChangeDetection, ClientConfig, Command, CommandError, Notice, PollerConfig,
    Renderer, ResourceKind, Session, View, ViewOptions,
};

// ============================================
// Mock gossiper
// ============================================

#[derive(Default)]
struct MockState {
    nodes: Vec<String>,
    routing: Vec<String>,
    messages: Vec<Value>,
    matches: Vec<String>,
    posts: Vec<(String, Value)>,
    gets: usize,
    fail_gets: bool,
}

type Shared = Arc<Mutex<MockState>>;

async fn get_nodes(State(state): State<Shared>) -> Response {
    collection(&state, |s| json!({ "nodes": s.nodes }))
}

async fn get_routing(State(state): State<Shared>) -> Response {
    collection(&state, |s| json!({ "nodes": s.routing }))
}

async fn get_messages(State(state): State<Shared>) -> Response {
    collection(&state, |s| json!({ "messages": s.messages }))
}

async fn get_matches(State(state): State<Shared>) -> Response {
    collection(&state, |s| json!({ "matches": s.matches }))
}

fn collection(state: &Shared, body: impl Fn(&MockState) -> Value) -> Response {
    let mut s = state.lock().unwrap();
    s.gets += 1;
    if s.fail_gets {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    Json(body(&s)).into_response()
}

async fn get_id() -> Json<Value> {
    Json(json!({ "id": "nodeA" }))
}

async fn post_command(State(state): State<Shared>, uri: Uri, Json(body): Json<Value>) -> Response {
    if body["Name"] == "slow.bin" {
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    let path = uri.path().to_string();
    let mut s = state.lock().unwrap();
    s.posts.push((path.clone(), body.clone()));

    match path.as_str() {
        "/sharing" if body["Name"] == "nonexistent.txt" => {
            (StatusCode::BAD_REQUEST, "no such file").into_response()
        }
        "/search" if body["Keywords"] == "refused" => {
            Json(json!({ "success": false })).into_response()
        }
        "/message" => {
            let id = s.messages.len() + 1;
            let text = body["text"].clone();
            s.messages.push(json!({ "Origin": "nodeA", "ID": id, "Text": text }));
            Json(json!({ "success": true })).into_response()
        }
        _ => Json(json!({ "success": true })).into_response(),
    }
}

async fn spawn_gossiper(state: Shared) -> String {
    let app = Router::new()
        .route("/id", get(get_id))
        .route("/node", get(get_nodes).post(post_command))
        .route("/routing", get(get_routing).post(post_command))
        .route("/message", get(get_messages).post(post_command))
        .route("/search", get(get_matches).post(post_command))
        .route("/sharing", axum::routing::post(post_command))
        .route("/request", axum::routing::post(post_command))
        .route("/download", axum::routing::post(post_command))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

// ============================================
// Recording renderer
// ============================================

#[derive(Default)]
struct RecordingRenderer {
    renders: Mutex<Vec<(ResourceKind, View)>>,
    ids: Mutex<Vec<String>>,
    notices: Mutex<Vec<Notice>>,
}

impl RecordingRenderer {
    fn renders_of(&self, kind: ResourceKind) -> Vec<View> {
        self.renders
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, v)| v.clone())
            .collect()
    }

    fn texts(view: &View) -> Vec<String> {
        view.nodes.iter().map(|n| n.text().to_string()).collect()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&self, kind: ResourceKind, view: &View) {
        self.renders.lock().unwrap().push((kind, view.clone()));
    }

    fn identity(&self, id: &str) {
        self.ids.lock().unwrap().push(id.to_string());
    }

    fn notify(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}

// ============================================
// Helpers
// ============================================

const POLL: Duration = Duration::from_millis(50);

fn client(url: &str) -> ApiClient {
    ApiClient::new(ClientConfig {
        base_url: url.to_string(),
        request_timeout_ms: 2000,
    })
    .unwrap()
}

fn poller_config() -> PollerConfig {
    PollerConfig {
        interval: POLL,
        change_detection: ChangeDetection::Growth,
        view: ViewOptions::default(),
    }
}

async fn start(state: &Shared) -> (Session, Arc<RecordingRenderer>) {
    let url = spawn_gossiper(Arc::clone(state)).await;
    let renderer = Arc::new(RecordingRenderer::default());
    let session = Session::with_client(client(&url), poller_config(), renderer.clone());
    (session, renderer)
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..100 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("condition not met within 2s");
}

/// Let several poll intervals elapse
async fn settle() {
    tokio::time::sleep(POLL * 6).await;
}

fn shared(state: MockState) -> Shared {
    Arc::new(Mutex::new(state))
}

// ============================================
// Polling
// ============================================

#[tokio::test]
async fn test_node_poll_renders_once_then_only_on_growth() {
    let state = shared(MockState {
        nodes: vec!["10.0.0.1".to_string()],
        ..Default::default()
    });
    let (session, renderer) = start(&state).await;

    wait_until(|| !renderer.renders_of(ResourceKind::Peers).is_empty()).await;
    settle().await;

    let renders = renderer.renders_of(ResourceKind::Peers);
    assert_eq!(renders.len(), 1);
    assert_eq!(RecordingRenderer::texts(&renders[0]), vec!["10.0.0.1"]);

    state.lock().unwrap().nodes.push("10.0.0.2".to_string());
    wait_until(|| renderer.renders_of(ResourceKind::Peers).len() == 2).await;

    // Shrinking is never observed
    state.lock().unwrap().nodes = vec!["10.0.0.9".to_string()];
    settle().await;
    let renders = renderer.renders_of(ResourceKind::Peers);
    assert_eq!(renders.len(), 2);
    assert_eq!(
        RecordingRenderer::texts(&renders[1]),
        vec!["10.0.0.1", "10.0.0.2"]
    );

    session.shutdown().await;
}

#[tokio::test]
async fn test_empty_collections_never_render() {
    let state = shared(MockState::default());
    let (session, renderer) = start(&state).await;

    settle().await;
    assert!(renderer.renders.lock().unwrap().is_empty());

    session.shutdown().await;
}

#[tokio::test]
async fn test_identity_rendered_once() {
    let state = shared(MockState::default());
    let (session, renderer) = start(&state).await;

    wait_until(|| !renderer.ids.lock().unwrap().is_empty()).await;
    settle().await;
    assert_eq!(*renderer.ids.lock().unwrap(), vec!["nodeA".to_string()]);

    session.shutdown().await;
}

#[tokio::test]
async fn test_failed_polls_are_silent_and_retried() {
    let state = shared(MockState {
        nodes: vec!["10.0.0.1".to_string()],
        fail_gets: true,
        ..Default::default()
    });
    let (session, renderer) = start(&state).await;

    settle().await;
    assert!(renderer.renders_of(ResourceKind::Peers).is_empty());
    assert!(renderer.notices.lock().unwrap().is_empty());

    state.lock().unwrap().fail_gets = false;
    wait_until(|| renderer.renders_of(ResourceKind::Peers).len() == 1).await;

    session.shutdown().await;
}

#[tokio::test]
async fn test_message_shapes() {
    let state = shared(MockState {
        messages: vec![
            json!({ "Origin": "alice", "ID": 1, "Text": "hi" }),
            json!("legacy line"),
            json!({ "Origin": "bob", "Text": "no id" }),
        ],
        ..Default::default()
    });
    let (session, renderer) = start(&state).await;

    wait_until(|| !renderer.renders_of(ResourceKind::Messages).is_empty()).await;
    let view = &renderer.renders_of(ResourceKind::Messages)[0];
    let texts = RecordingRenderer::texts(view);
    assert_eq!(texts.len(), 3);
    assert_eq!(texts[0], "Origin: alice ID: 1 Text: hi");
    assert_eq!(texts[1], "legacy line");
    assert!(texts[2].contains("no id"));

    session.shutdown().await;
}

#[tokio::test]
async fn test_selectable_views() {
    let state = shared(MockState {
        routing: vec!["alice".to_string(), "bob".to_string()],
        matches: vec!["_SharedFiles/HASH1.txt".to_string()],
        ..Default::default()
    });
    let (session, renderer) = start(&state).await;

    wait_until(|| {
        !renderer.renders_of(ResourceKind::RoutablePeers).is_empty()
            && !renderer.renders_of(ResourceKind::SearchMatches).is_empty()
    })
    .await;

    let routing = &renderer.renders_of(ResourceKind::RoutablePeers)[0];
    assert_eq!(routing.options().collect::<Vec<_>>(), vec!["alice", "bob"]);

    let matches = &renderer.renders_of(ResourceKind::SearchMatches)[0];
    assert_eq!(matches.options().collect::<Vec<_>>(), vec!["HASH1.txt"]);

    session.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_stops_polling() {
    let state = shared(MockState::default());
    let (session, _renderer) = start(&state).await;

    wait_until(|| state.lock().unwrap().gets >= 4).await;
    session.shutdown().await;

    // Fetches already in flight may still land
    tokio::time::sleep(POLL * 2).await;
    let after_shutdown = state.lock().unwrap().gets;
    settle().await;
    assert_eq!(state.lock().unwrap().gets, after_shutdown);
}

// ============================================
// Commands
// ============================================

#[tokio::test]
async fn test_invalid_peer_never_reaches_gossiper() {
    let state = shared(MockState::default());
    let (session, renderer) = start(&state).await;

    for addr in ["999.1.1.1", "1.2.3", "abc.def.ghi.jkl"] {
        let err = session
            .submit(Command::AddPeer {
                addr: addr.to_string(),
            })
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }
    assert!(state.lock().unwrap().posts.is_empty());

    let ack = session
        .submit(Command::AddPeer {
            addr: "192.168.1.1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(ack.message, "Peer added");
    assert_eq!(
        state.lock().unwrap().posts,
        vec![("/node".to_string(), json!({ "addr": "192.168.1.1" }))]
    );

    let notices = renderer.notices.lock().unwrap().clone();
    assert_eq!(notices.len(), 4);
    assert_eq!(notices[0], Notice::failure("Bad IP address: 999.1.1.1"));
    assert_eq!(notices[3], Notice::success("Peer added"));

    session.shutdown().await;
}

#[tokio::test]
async fn test_share_rejection_has_its_own_message() {
    let state = shared(MockState::default());
    let (session, renderer) = start(&state).await;

    let err = session
        .submit(Command::ShareFile {
            name: "nonexistent.txt".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CommandError::ShareRejected { ref name, status: 400 } if name == "nonexistent.txt"
    ));
    assert_eq!(
        renderer.notices.lock().unwrap().last().cloned(),
        Some(Notice::failure("Input file name not valid: nonexistent.txt"))
    );

    session.shutdown().await;
}

#[tokio::test]
async fn test_unsuccessful_ack_is_generic_failure() {
    let state = shared(MockState::default());
    let (session, _renderer) = start(&state).await;

    let err = session
        .submit(Command::Search {
            keywords: "refused".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CommandError::Rejected { command: "Search" }));

    session.shutdown().await;
}

#[tokio::test]
async fn test_command_payloads() {
    let state = shared(MockState::default());
    let (session, _renderer) = start(&state).await;

    let commands = vec![
        Command::PrivateMessage {
            dest: "bob".to_string(),
            text: "psst".to_string(),
        },
        Command::ShareFile {
            name: "notes.txt".to_string(),
        },
        Command::RequestFile {
            dest: "bob".to_string(),
            file_name: "copy.txt".to_string(),
            meta_hash: "abcd".to_string(),
        },
        Command::Search {
            keywords: "cat,dog".to_string(),
        },
        Command::Download {
            name: "HASH1.txt".to_string(),
        },
        // Empty values are forwarded as typed
        Command::PostMessage {
            text: String::new(),
        },
    ];
    for command in commands {
        session.submit(command).await.unwrap();
    }

    let posts = state.lock().unwrap().posts.clone();
    assert_eq!(
        posts,
        vec![
            ("/routing".to_string(), json!({ "Text": "psst", "Dest": "bob" })),
            ("/sharing".to_string(), json!({ "Name": "notes.txt" })),
            (
                "/request".to_string(),
                json!({ "Dest": "bob", "FileName": "copy.txt", "MetaHash": "abcd" })
            ),
            ("/search".to_string(), json!({ "Keywords": "cat,dog" })),
            ("/download".to_string(), json!({ "Name": "HASH1.txt" })),
            ("/message".to_string(), json!({ "text": "" })),
        ]
    );

    session.shutdown().await;
}

#[tokio::test]
async fn test_posted_message_appears_after_next_poll() {
    let state = shared(MockState::default());
    let (session, renderer) = start(&state).await;

    let mut forms = peerster_gui::Forms::default();
    forms.message.text.set("hello world");
    session.submit_form(&mut forms.message).await.unwrap();
    assert!(forms.message.text.is_empty());

    wait_until(|| !renderer.renders_of(ResourceKind::Messages).is_empty()).await;
    let view = &renderer.renders_of(ResourceKind::Messages)[0];
    assert_eq!(
        RecordingRenderer::texts(view),
        vec!["Origin: nodeA ID: 1 Text: hello world"]
    );

    session.shutdown().await;
}

#[tokio::test]
async fn test_spawned_submission_does_not_block_others() {
    let state = shared(MockState::default());
    let (session, renderer) = start(&state).await;

    let slow = session.spawn_submit(Command::Download {
        name: "slow.bin".to_string(),
    });

    let ack = session
        .submit(Command::AddPeer {
            addr: "10.0.0.7:5000".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(ack.message, "Peer added");
    assert!(!slow.is_finished());

    let ack = slow.await.unwrap().unwrap();
    assert_eq!(ack.message, "Download started");

    let notices = renderer.notices.lock().unwrap().clone();
    assert_eq!(
        notices,
        vec![
            Notice::success("Peer added"),
            Notice::success("Download started"),
        ]
    );

    session.shutdown().await;
}
