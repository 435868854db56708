//! End-to-end tests against the live todo server.
//!
//! # Design
//! Starts the server on a random port, then exercises every core client
//! operation over real HTTP using ureq. Validates that the core's request
//! building and response parsing work end-to-end with the actual server.

use serde_json::json;
use todo_core::{
    ApiError, CreateTodo, HttpMethod, HttpRequest, HttpResponse, TodoClient, UpdateTodo,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.path).call(),
        (HttpMethod::Delete, _) => agent.delete(&req.path).call(),
        (HttpMethod::Post, Some(body)) => {
            agent.post(&req.path).content_type("application/json").send(body.as_bytes())
        }
        (HttpMethod::Post, None) => agent.post(&req.path).send_empty(),
        (HttpMethod::Patch, Some(body)) => {
            agent.patch(&req.path).content_type("application/json").send(body.as_bytes())
        }
        (HttpMethod::Patch, None) => agent.patch(&req.path).send_empty(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

/// Start the server on a random port and return a client pointed at it.
fn start_server() -> TodoClient {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            todo_server::run(listener).await
        })
        .unwrap();
    });

    TodoClient::new(&format!("http://{addr}"))
}

#[test]
fn hello_endpoint() {
    let client = start_server();

    // POST echoes the body.
    let payload = json!({"name": "integration", "message": "Testing API"});
    let req = client.build_hello(&payload).unwrap();
    let reply = client.parse_hello(execute(req)).unwrap();
    assert_eq!(reply.message, "Hello from todo-server!");
    assert_eq!(reply.received, payload);
    assert!(chrono::DateTime::parse_from_rfc3339(&reply.timestamp).is_ok());

    // GET is always rejected.
    let mut req = client.build_hello(&json!({})).unwrap();
    req.method = HttpMethod::Get;
    req.body = None;
    let resp = execute(req);
    assert_eq!(resp.status, 405);
    assert!(resp.body.contains("POST"));

    // Malformed JSON is a 400 with the parser's message.
    let mut req = client.build_hello(&json!({})).unwrap();
    req.body = Some("invalid json".to_string());
    let err = client.parse_hello(execute(req)).unwrap_err();
    match err {
        ApiError::BadRequest { error, message } => {
            assert_eq!(error, "Invalid JSON body");
            assert!(message.is_some());
        }
        other => panic!("expected BadRequest, got {other:?}"),
    }
}

#[test]
fn create_requires_title() {
    let client = start_server();

    let before = client.parse_list_todos(execute(client.build_list_todos())).unwrap();

    let mut req = client
        .build_create_todo(&CreateTodo {
            title: String::new(),
            completed: Some(false),
        })
        .unwrap();
    req.body = Some(r#"{"completed":false}"#.to_string());
    let err = client.parse_create_todo(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::BadRequest { ref error, .. } if error.contains("title")));

    let after = client.parse_list_todos(execute(client.build_list_todos())).unwrap();
    assert_eq!(before.len(), after.len());
}

#[test]
fn missing_todo_is_not_found() {
    let client = start_server();
    let err = client
        .parse_get_todo(execute(client.build_get_todo("non_existent_id")))
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[test]
fn crud_lifecycle() {
    let client = start_server();

    // Step 1: list, the two seeded samples.
    let req = client.build_list_todos();
    let todos = client.parse_list_todos(execute(req)).unwrap();
    assert_eq!(todos.len(), 2, "expected seeded list");

    // Step 2: create a todo.
    let create_input = CreateTodo {
        title: "Buy milk".to_string(),
        completed: None,
    };
    let req = client.build_create_todo(&create_input).unwrap();
    let created = client.parse_create_todo(execute(req)).unwrap();
    assert_eq!(created.title, "Buy milk");
    assert!(!created.completed);
    assert!(!created.id.is_empty());
    assert!(chrono::DateTime::parse_from_rfc3339(&created.created_at).is_ok());
    let id = created.id.clone();

    // Step 3: get the created todo.
    let req = client.build_get_todo(&id);
    let fetched = client.parse_get_todo(execute(req)).unwrap();
    assert_eq!(fetched, created);

    // Step 4: complete it.
    let update_input = UpdateTodo {
        title: None,
        completed: Some(true),
    };
    let req = client.build_update_todo(&id, &update_input).unwrap();
    let updated = client.parse_update_todo(execute(req)).unwrap();
    assert_eq!(updated.title, "Buy milk");
    assert!(updated.completed);
    assert_eq!(updated.created_at, created.created_at);

    // Step 5: rename it.
    let update_input = UpdateTodo {
        title: Some("Buy oat milk".to_string()),
        completed: None,
    };
    let req = client.build_update_todo(&id, &update_input).unwrap();
    let updated = client.parse_update_todo(execute(req)).unwrap();
    assert_eq!(updated.title, "Buy oat milk");
    assert!(updated.completed);

    // Step 6: list, seeds plus one.
    let req = client.build_list_todos();
    let todos = client.parse_list_todos(execute(req)).unwrap();
    assert_eq!(todos.len(), 3);

    // Step 7: delete.
    let req = client.build_delete_todo(&id);
    let confirmation = client.parse_delete_todo(execute(req)).unwrap();
    assert_eq!(confirmation.id, id);

    // Step 8: get after delete, NotFound.
    let req = client.build_get_todo(&id);
    let err = client.parse_get_todo(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Step 9: delete again, NotFound.
    let req = client.build_delete_todo(&id);
    let err = client.parse_delete_todo(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Step 10: list, back to the seeds.
    let req = client.build_list_todos();
    let todos = client.parse_list_todos(execute(req)).unwrap();
    assert_eq!(todos.len(), 2, "expected seeded list after delete");
}
