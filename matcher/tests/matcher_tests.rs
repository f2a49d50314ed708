use poemdex_core::keywords::{decode_payload, SearchSegmenter, DEFAULT_SCORE_THRESHOLD};
use poemdex_core::load_corpus;
use poemdex_matcher::sink::MatchSink;
use poemdex_matcher::{fetch_payload, match_records, Summary};
use std::fs;
use std::io::{Cursor, Read, Write};
use std::net::TcpListener;
use std::thread;
use tempfile::tempdir;

const POEMS: &str = "床前明月光，疑是地上霜。\n\
白日依山尽，黄河入海流。\n\
千山鸟飞绝，万径人踪灭。\n";

const PAYLOAD: &str = r#"[
    { "image": "river.jpg", "result": [
        { "keyword": "黄河", "score": 0.91 },
        { "keyword": "桥", "score": 0.05 }
    ] },
    { "image": "moon.jpg", "result": [{ "keyword": "明月", "score": 0.7 }] },
    { "image": "dragon.jpg", "result": [{ "keyword": "龙", "score": 0.6 }] },
    { "image": "blurry.jpg", "result": [{ "keyword": "明月", "score": 0.02 }] },
    { "result": [{ "keyword": "山", "score": 0.5 }] },
    { "image": "bad.jpg", "result": [{ "keyword": "山", "score": 7.0 }] }
]"#;

#[test]
fn matches_each_image_and_skips_bad_records() {
    let dir = tempdir().unwrap();
    let index = load_corpus(Cursor::new(POEMS)).unwrap();
    let sink = MatchSink::open(dir.path().join("matches.db")).unwrap();
    let records = decode_payload(PAYLOAD).unwrap();

    let summary = match_records(&index, records, DEFAULT_SCORE_THRESHOLD, &SearchSegmenter, &sink).unwrap();
    assert_eq!(summary, Summary { matched: 2, unmatched: 2, skipped: 2 });
    assert_eq!(sink.len(), 4);

    let river = sink.get("river.jpg").unwrap().unwrap();
    assert_eq!(river.doc_id, Some(1));
    assert_eq!(river.query, "黄河");

    let moon = sink.get("moon.jpg").unwrap().unwrap();
    assert_eq!(moon.doc_id, Some(0));
    assert_eq!(moon.poem.as_deref(), Some("床前明月光，疑是地上霜。"));

    assert_eq!(sink.get("dragon.jpg").unwrap().unwrap().doc_id, None);
    let blurry = sink.get("blurry.jpg").unwrap().unwrap();
    assert_eq!(blurry.query, "");
    assert_eq!(blurry.doc_id, None);
    assert!(sink.get("bad.jpg").unwrap().is_none());
}

#[tokio::test]
async fn reads_local_payload_files() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sample.json");
    fs::write(&path, PAYLOAD).unwrap();
    let payload = fetch_payload(path.to_str().unwrap(), 5, "test").await.unwrap();
    assert_eq!(decode_payload(&payload).unwrap().len(), 6);
}

#[tokio::test]
async fn missing_payload_is_an_error() {
    assert!(fetch_payload("/nonexistent/sample.json", 5, "test").await.is_err());
}

#[tokio::test]
async fn unreachable_service_is_an_error() {
    // Nothing listens on port 1.
    let err = fetch_payload("http://127.0.0.1:1/sample.json", 2, "test").await.unwrap_err();
    assert!(err.to_string().contains("unreachable"), "{err}");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut req = Vec::new();
        let mut buf = [0u8; 1024];
        while !req.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 { break; }
            req.extend_from_slice(&buf[..n]);
        }
        stream
            .write_all(b"HTTP/1.1 503 Service Unavailable\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
            .unwrap();
    });

    let err = fetch_payload(&format!("http://{addr}/sample.json"), 5, "test").await.unwrap_err();
    assert!(err.to_string().contains("503"), "{err}");
    server.join().unwrap();
}
