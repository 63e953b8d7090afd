mod common;

use common::{platform, Call, ScriptedBackend, BASE_URL};
use reqwest::Method;
use serde_json::json;
use std::io::Write;
use std::path::Path;
use tikpost::{PostError, PostVideoRequest};

const INIT_OK: &str = r#"{"upload_url": "https://upload.test/session/1", "video_url": "https://cdn.test/v/1.mp4"}"#;

fn video_file(contents: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("clip")
        .suffix(".mp4")
        .tempfile()
        .unwrap();
    file.write_all(contents).unwrap();
    file
}

#[test]
fn test_post_by_url_formats_caption() {
    let backend = ScriptedBackend::new();
    backend.respond(200, r#"{"data": {"publish_id": "p1"}}"#);

    let response = platform(&backend)
        .post_video_by_url("u", "Hello", &["fyp", "viral"])
        .unwrap();
    assert_eq!(response.get_string("data/publish_id"), Some("p1".to_string()));

    let sent = backend.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, Method::POST);
    assert_eq!(sent[0].url, format!("{}/post/publish/video/url", BASE_URL));
    assert_eq!(
        sent[0].body,
        Some(json!({
            "video_url": "u",
            "caption": "Hello #fyp #viral",
            "post_info": {
                "title": "Hello #fyp #viral",
                "disable_comment": false,
                "disable_duet": false,
                "disable_stitch": false
            },
            "api_secret": "test-secret"
        }))
    );
}

#[test]
fn test_post_by_url_without_hashtags() {
    let backend = ScriptedBackend::new();
    backend.respond(200, "{}");

    let no_tags: [&str; 0] = [];
    platform(&backend).post_video_by_url("u", "Hello", &no_tags).unwrap();

    let body = backend.sent()[0].body.clone().unwrap();
    assert_eq!(body["caption"], "Hello");
    assert_eq!(body["post_info"]["title"], "Hello");
}

#[test]
fn test_title_is_first_80_characters() {
    let backend = ScriptedBackend::new();
    backend.respond(200, "{}");
    let caption = "a".repeat(90);

    platform(&backend).post_video_by_url("u", &caption, &["tag"]).unwrap();

    let body = backend.sent()[0].body.clone().unwrap();
    assert_eq!(body["caption"], format!("{} #tag", caption));
    assert_eq!(body["post_info"]["title"], "a".repeat(80));
}

#[test]
fn test_post_video_file_runs_steps_in_order() {
    let backend = ScriptedBackend::new();
    backend
        .respond(200, INIT_OK)
        .respond(200, r#"{"data": {"publish_id": "p2"}}"#);
    backend.upload_responds(201, "");
    let file = video_file(b"\x00\x00\x00\x18ftypmp42");

    let response = platform(&backend)
        .post_video_file(file.path(), "Clip", &["fyp"])
        .unwrap();
    assert_eq!(response.get_string("data/publish_id"), Some("p2".to_string()));

    let calls = backend.calls();
    assert_eq!(calls.len(), 3);

    let file_name = file.path().file_name().unwrap().to_string_lossy().to_string();
    match &calls[0] {
        Call::Send(request) => {
            assert_eq!(request.url, format!("{}/post/publish/video/init", BASE_URL));
            assert_eq!(
                request.body,
                Some(json!({
                    "source": "FILE_UPLOAD",
                    "content_type": "video/mp4",
                    "filename": file_name.as_str(),
                    "api_secret": "test-secret"
                }))
            );
        }
        other => panic!("expected init request first, got {:?}", other),
    }
    match &calls[1] {
        Call::Upload { url, part } => {
            assert_eq!(url, "https://upload.test/session/1");
            assert_eq!(part.field, "file");
            assert_eq!(part.file_name, file_name);
            assert_eq!(part.mime_type, "video/mp4");
            assert_eq!(part.bytes, b"\x00\x00\x00\x18ftypmp42");
        }
        other => panic!("expected upload second, got {:?}", other),
    }
    match &calls[2] {
        Call::Send(request) => {
            assert_eq!(request.url, format!("{}/post/publish/video/url", BASE_URL));
            let body = request.body.clone().unwrap();
            assert_eq!(body["video_url"], "https://cdn.test/v/1.mp4");
            assert_eq!(body["caption"], "Clip #fyp");
        }
        other => panic!("expected publish request last, got {:?}", other),
    }
}

#[test]
fn test_failed_upload_skips_publish() {
    let backend = ScriptedBackend::new();
    backend.respond(200, INIT_OK).respond(200, "{}");
    backend.upload_responds(500, "storage unavailable");
    let file = video_file(b"video");

    let err = platform(&backend)
        .post_video_file(file.path(), "Clip", &["fyp"])
        .unwrap_err();

    match err {
        PostError::Upload { ref reason, .. } => {
            assert!(reason.contains("500"), "unexpected reason: {}", reason)
        }
        other => panic!("expected PostError::Upload, got {:?}", other),
    }

    let calls = backend.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(calls[1], Call::Upload { .. }));
}

#[test]
fn test_upload_is_not_retried() {
    let backend = ScriptedBackend::new();
    backend.respond(200, INIT_OK);
    // no scripted upload response: the upload sees a dropped connection
    let file = video_file(b"video");

    let err = platform(&backend)
        .post_video_file(file.path(), "", &["fyp"])
        .unwrap_err();

    assert!(matches!(err, PostError::Upload { .. }));
    let uploads = backend
        .calls()
        .into_iter()
        .filter(|call| matches!(call, Call::Upload { .. }))
        .count();
    assert_eq!(uploads, 1);
}

#[test]
fn test_failed_init_skips_upload_and_publish() {
    let backend = ScriptedBackend::new();
    backend.respond(403, "forbidden");
    let file = video_file(b"video");

    let err = platform(&backend)
        .post_video_file(file.path(), "Clip", &["fyp"])
        .unwrap_err();

    assert_eq!(err.status_code(), Some(403));
    assert_eq!(backend.calls().len(), 1);
}

#[test]
fn test_init_without_upload_url() {
    let backend = ScriptedBackend::new();
    backend.respond(200, r#"{"video_url": "https://cdn.test/v/1.mp4"}"#);
    let file = video_file(b"video");

    let err = platform(&backend)
        .post_video_file(file.path(), "Clip", &["fyp"])
        .unwrap_err();

    assert!(matches!(err, PostError::UnexpectedResponse(_)));
    assert_eq!(backend.calls().len(), 1);
}

#[test]
fn test_missing_local_file() {
    let backend = ScriptedBackend::new();
    backend.respond(200, INIT_OK);

    let err = platform(&backend)
        .post_video_file(Path::new("/no/such/video.mp4"), "Clip", &["fyp"])
        .unwrap_err();

    assert!(matches!(err, PostError::Upload { .. }));
    assert!(backend
        .calls()
        .iter()
        .all(|call| !matches!(call, Call::Upload { .. })));
    assert_eq!(backend.sent().len(), 1);
}

#[test]
fn test_get_account_info_is_a_plain_get() {
    let backend = ScriptedBackend::new();
    backend
        .respond(200, r#"{"data": {"user": {"open_id": "o1"}}}"#)
        .respond(200, r#"{"data": {"user": {"open_id": "o1"}}}"#);
    let client = platform(&backend);

    let first = client.get_account_info().unwrap();
    let second = client.get_account_info().unwrap();
    assert_eq!(first, second);

    let sent = backend.sent();
    assert_eq!(sent.len(), 2);
    for request in sent {
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url, format!("{}/user/info", BASE_URL));
        assert!(request.body.is_none());
    }
}

#[test]
fn test_get_video_status_sends_query() {
    let backend = ScriptedBackend::new();
    backend.respond(200, r#"{"data": {"status": "PUBLISH_COMPLETE"}}"#);

    let response = platform(&backend).get_video_status("v_42").unwrap();
    assert_eq!(
        response.get_string("data/status"),
        Some("PUBLISH_COMPLETE".to_string())
    );

    let sent = backend.sent();
    assert_eq!(sent[0].method, Method::GET);
    assert_eq!(
        sent[0].url,
        format!("{}/post/publish/status?video_id=v_42", BASE_URL)
    );
    assert!(sent[0].body.is_none());
}

#[test]
fn test_post_video_dispatches_on_source() {
    let backend = ScriptedBackend::new();
    backend.respond(200, "{}");

    let request = PostVideoRequest::from_url("https://example.com/v.mp4")
        .with_caption("Hi")
        .with_hashtags(["a"]);
    platform(&backend).post_video(&request).unwrap();

    let body = backend.sent()[0].body.clone().unwrap();
    assert_eq!(body["video_url"], "https://example.com/v.mp4");
    assert_eq!(body["caption"], "Hi #a");
}
