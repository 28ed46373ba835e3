// Integration tests for userdash

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::Mutex;
use std::thread::{self, JoinHandle};

use userdash::directory::{HttpDirectory, User, UserDirectory, UserForm, UserId, UserRecord};
use userdash::error::DirectoryError;

/// One request as seen by the stub server.
#[derive(Debug)]
struct Seen {
    method: String,
    path: String,
    body: String,
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        404 => "Not Found",
        _ => "Internal Server Error",
    }
}

/// Serve one canned `(status, body)` per connection, in order, and return what was asked.
fn serve(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<Seen>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}/users", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for (status, body) in responses {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut parts = request_line.split_whitespace();
            let method = parts.next().unwrap_or_default().to_string();
            let path = parts.next().unwrap_or_default().to_string();

            let mut content_length = 0usize;
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).unwrap();
                let header = header.trim_end();
                if header.is_empty() {
                    break;
                }
                if let Some((name, value)) = header.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
            }
            let mut raw = vec![0u8; content_length];
            reader.read_exact(&mut raw).unwrap();
            seen.push(Seen {
                method,
                path,
                body: String::from_utf8(raw).unwrap(),
            });

            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                reason(status),
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();
        }
        seen
    });
    (base, handle)
}

fn directory(base: &str) -> HttpDirectory {
    let client = reqwest::blocking::Client::builder().no_proxy().build().unwrap();
    HttpDirectory::with_client(client, base)
}

// 1) REST calls against a local stub
#[test]
fn http_directory_speaks_rest() {
    let (base, server) = serve(vec![
        (
            200,
            r#"[{"id":1,"name":"Ann","email":"ann@x.com","phone":"1-770"},{"id":2,"name":"Bob","email":"bob@y.com","department":"Ops"}]"#,
        ),
        (201, r#"{"name":"Bo","email":"bo@x.com","department":"","id":11}"#),
        (200, r#"{"name":"Ann B","email":"ann@x.com","department":"QA"}"#),
        (200, "{}"),
    ]);
    let dir = directory(&base);

    let users = dir.list().expect("list");
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].extra["phone"], "1-770");
    assert_eq!(users[1].department_label(), "Ops");

    let mut form = UserForm::default();
    form.name = "Bo".into();
    form.email = "bo@x.com".into();
    let created = dir.create(&form).expect("create");
    assert_eq!(created.id, Some(UserId::Number(11)));

    let mut edit = UserForm::from_user(&users[0]);
    edit.name = "Ann B".into();
    edit.department = "QA".into();
    let updated = dir.update(&UserId::Number(1), &edit).expect("update");
    assert_eq!(updated.id, None);
    assert_eq!(updated.department.as_deref(), Some("QA"));

    dir.delete(&UserId::Number(2)).expect("delete");

    let seen = server.join().unwrap();
    let calls: Vec<_> = seen.iter().map(|s| (s.method.as_str(), s.path.as_str())).collect();
    assert_eq!(
        calls,
        vec![("GET", "/users"), ("POST", "/users"), ("PUT", "/users/1"), ("DELETE", "/users/2")]
    );

    let posted: serde_json::Value = serde_json::from_str(&seen[1].body).unwrap();
    assert_eq!(posted["id"], serde_json::Value::Null);
    assert_eq!(posted["name"], "Bo");
    assert_eq!(posted["department"], "");

    let put: serde_json::Value = serde_json::from_str(&seen[2].body).unwrap();
    assert_eq!(put["id"], 1);
    assert_eq!(put["phone"], "1-770");
    assert!(seen[3].body.is_empty());
}

// 2) String ids are kept as strings in paths and bodies
#[test]
fn http_directory_handles_string_ids() {
    let (base, server) = serve(vec![
        (200, r#"[{"id":"a1","name":"Ann","email":"ann@x.com"}]"#),
        (201, r#"{"id":"b7","name":"Bo","email":"bo@x.com"}"#),
        (200, r#"{"id":"a1","name":"Ann","email":"ann@x.com","department":"QA"}"#),
    ]);
    let dir = directory(&base);

    let users = dir.list().expect("list");
    assert_eq!(users[0].id, UserId::from("a1"));

    let mut form = UserForm::default();
    form.name = "Bo".into();
    form.email = "bo@x.com".into();
    assert_eq!(dir.create(&form).expect("create").id, Some(UserId::from("b7")));

    let mut edit = UserForm::from_user(&users[0]);
    edit.department = "QA".into();
    dir.update(&users[0].id, &edit).expect("update");

    let seen = server.join().unwrap();
    assert_eq!(seen[2].path, "/users/a1");
    let put: serde_json::Value = serde_json::from_str(&seen[2].body).unwrap();
    assert_eq!(put["id"], "a1");
}

// 3) Non-2xx answers and bad bodies are errors
#[test]
fn http_directory_reports_failures() {
    let (base, server) = serve(vec![(500, "{}"), (404, ""), (200, "not json")]);
    let dir = directory(&base);

    match dir.list() {
        Err(DirectoryError::Status { status, .. }) => assert_eq!(status, 500),
        other => panic!("unexpected {other:?}"),
    }
    match dir.delete(&UserId::Number(9)) {
        Err(DirectoryError::Status { status, url, .. }) => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/users/9"));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(dir.list(), Err(DirectoryError::Decode { .. })));
    server.join().unwrap();
}

// 4) Nothing listening
#[test]
fn http_directory_transport_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let dir = directory(&format!("http://127.0.0.1:{port}/users"));
    assert!(matches!(dir.list(), Err(DirectoryError::Transport { .. })));
}

/// Directory that keeps users in memory and hands out ids from 11.
#[derive(Default)]
struct MemoryDirectory {
    users: Mutex<Vec<User>>,
    fail_deletes: bool,
}

impl UserDirectory for MemoryDirectory {
    fn list(&self) -> userdash::Result<Vec<User>> {
        Ok(self.users.lock().unwrap().clone())
    }

    fn create(&self, form: &UserForm) -> userdash::Result<UserRecord> {
        Ok(UserRecord {
            id: Some(UserId::Number(11)),
            name: form.name.clone(),
            email: form.email.clone(),
            department: Some(form.department.clone()),
            extra: Default::default(),
        })
    }

    fn update(&self, _id: &UserId, form: &UserForm) -> userdash::Result<UserRecord> {
        Ok(UserRecord {
            id: form.id.clone(),
            name: form.name.clone(),
            email: form.email.clone(),
            department: Some(form.department.clone()),
            extra: form.extra.clone(),
        })
    }

    fn delete(&self, id: &UserId) -> userdash::Result<()> {
        if self.fail_deletes {
            return Err(DirectoryError::status(
                reqwest::Method::DELETE,
                format!("mem://users/{id}"),
                500,
            ));
        }
        self.users.lock().unwrap().retain(|u| &u.id != id);
        Ok(())
    }
}

mod dashboard_flow {
    use super::*;
    use std::time::Duration;
    use userdash::app::effects::{self, Effects};
    use userdash::app::reducer::update;
    use userdash::app::{AppState, Modal, Msg};
    use userdash::directory::FormField;

    /// Apply `msg` and run any resulting command to completion.
    fn step(app: &mut AppState, dir: &dyn UserDirectory, msg: Msg) {
        let mut next = Some(msg);
        while let Some(msg) = next.take() {
            if let Some(command) = update(app, msg) {
                next = Some(effects::perform(dir, command));
            }
        }
    }

    fn seeded(fail_deletes: bool) -> MemoryDirectory {
        MemoryDirectory {
            users: Mutex::new(vec![User::new(1, "Ann", "ann@x.com")]),
            fail_deletes,
        }
    }

    #[test]
    fn load_create_edit_delete() {
        let dir = seeded(false);
        let mut app = AppState::default();
        step(&mut app, &dir, Msg::LoadRequested);
        assert_eq!(app.users.len(), 1);

        step(&mut app, &dir, Msg::OpenCreate);
        step(&mut app, &dir, Msg::FormFieldChanged(FormField::Name, "Bo".into()));
        step(&mut app, &dir, Msg::FormFieldChanged(FormField::Email, "bo@x.com".into()));
        step(&mut app, &dir, Msg::Submit);
        assert_eq!(app.modal, Modal::Closed);
        assert_eq!(app.users[1].id, UserId::Number(2));
        assert_eq!(app.users[1].department_label(), "N/A");

        let ann = app.users[0].clone();
        step(&mut app, &dir, Msg::OpenEdit(ann));
        step(&mut app, &dir, Msg::FormFieldChanged(FormField::Department, "QA".into()));
        step(&mut app, &dir, Msg::Submit);
        assert_eq!(app.users[0].id, UserId::Number(1));
        assert_eq!(app.users[0].department_label(), "QA");

        step(&mut app, &dir, Msg::DeleteRequested(UserId::Number(1)));
        let ids: Vec<_> = app.users.iter().map(|u| u.id.clone()).collect();
        assert_eq!(ids, vec![UserId::Number(2)]);
        assert_eq!(app.errors.current(), None);
    }

    #[test]
    fn failed_delete_keeps_list_and_reports() {
        let dir = seeded(true);
        let mut app = AppState::default();
        step(&mut app, &dir, Msg::LoadRequested);
        step(&mut app, &dir, Msg::DeleteRequested(UserId::Number(1)));
        assert_eq!(app.users.len(), 1);
        assert_eq!(app.errors.message(), Some("Failed to delete user. Please try again."));
    }

    #[test]
    fn invalid_form_never_reaches_directory() {
        let dir = seeded(false);
        let mut app = AppState::default();
        step(&mut app, &dir, Msg::OpenCreate);
        step(&mut app, &dir, Msg::FormFieldChanged(FormField::Name, "Bo".into()));
        assert!(update(&mut app, Msg::Submit).is_none());
        assert_eq!(app.modal, Modal::OpenForCreate);
        assert!(app.form_hint.is_some());
    }

    #[test]
    fn worker_thread_reports_completion() {
        let dir = std::sync::Arc::new(seeded(false));
        let (fx, inbox) = Effects::new(dir);
        let mut app = AppState::default();
        let command = update(&mut app, Msg::LoadRequested).expect("fetch command");
        fx.spawn(command).expect("spawn").join().unwrap();

        let msg = inbox.recv_timeout(Duration::from_secs(5)).expect("completion");
        assert!(matches!(msg, Msg::UsersLoaded { .. }));
        assert!(update(&mut app, msg).is_none());
        assert_eq!(app.users[0].name, "Ann");
    }
}
