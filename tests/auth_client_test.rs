use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::sync::mpsc::{channel, Receiver};
use std::thread;

use dict_cli::api_client::ApiError;
use dict_cli::auth_client::{AuthClient, Credentials};

/// Serves exactly one HTTP request with a canned response and hands the raw
/// request back for inspection.
fn serve_once(status: &'static str, body: &'static str) -> (SocketAddr, Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = channel();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if let Some(end) = find_subsequence(&request, b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&request[..end]).to_string();
                let content_length = headers
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= end + 4 + content_length {
                    break;
                }
            }
        }
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
        let _ = tx.send(String::from_utf8_lossy(&request).to_string());
    });
    (addr, rx)
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[test]
fn test_login_posts_credentials_and_parses_the_user() {
    let (addr, rx) = serve_once(
        "200 OK",
        r#"{"email":"gil@example.com","username":"gil","is_verified":true}"#,
    );
    let client = AuthClient::new(&format!("http://{}", addr));

    let user = client
        .login(&Credentials {
            email: "gil@example.com".to_string(),
            password: "hunter2".to_string(),
        })
        .unwrap();

    assert_eq!(user.email, "gil@example.com");
    assert!(user.is_verified);
    let request = rx.recv().unwrap();
    assert!(request.starts_with("POST /users/login/"));
    assert!(request.contains("hunter2"));
}

#[test]
fn test_login_failure_surfaces_the_backend_message() {
    let (addr, _rx) = serve_once(
        "401 Unauthorized",
        r#"{"detail":["Invalid email or password."]}"#,
    );
    let client = AuthClient::new(&format!("http://{}", addr));

    let error = client
        .login(&Credentials {
            email: "gil@example.com".to_string(),
            password: "nope".to_string(),
        })
        .unwrap_err();

    match error {
        ApiError::Auth { message } => assert_eq!(message, "Invalid email or password."),
        other => panic!("expected auth error, got {other:?}"),
    }
}

#[test]
fn test_current_user_hits_the_me_endpoint() {
    let (addr, rx) = serve_once(
        "200 OK",
        r#"{"email":"gil@example.com","username":"gil","is_verified":false}"#,
    );
    let client = AuthClient::new(&format!("http://{}", addr));

    let user = client.current_user().unwrap();

    assert_eq!(user.username, "gil");
    assert!(rx.recv().unwrap().starts_with("GET /users/me/"));
}

#[test]
fn test_logout_succeeds_on_no_content() {
    let (addr, rx) = serve_once("204 No Content", "");
    let client = AuthClient::new(&format!("http://{}", addr));

    client.logout().unwrap();

    assert!(rx.recv().unwrap().starts_with("POST /users/logout/"));
}
