//! Raw-socket protocol conformance: framing, BOM tolerance, reply
//! ordering.

mod common;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

use common::spawn_harness;

/// Read newline-delimited JSON frames until `count` have arrived.
async fn read_frames(stream: &mut UnixStream, count: usize) -> Vec<serde_json::Value> {
    let mut frames = Vec::new();
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    while frames.len() < count {
        let n = stream.read(&mut chunk).await.expect("read");
        assert!(n > 0, "endpoint closed early");
        buf.extend_from_slice(&chunk[..n]);
        while let Some(pos) = buf.iter().position(|&b| b == b'\n') {
            let frame: Vec<u8> = buf.drain(..=pos).collect();
            frames.push(serde_json::from_slice(&frame).expect("frame is JSON"));
            if frames.len() == count {
                break;
            }
        }
    }
    frames
}

#[tokio::test]
async fn bom_prefixed_request_is_served() {
    let harness = spawn_harness().await;

    let mut stream = UnixStream::connect(&harness.socket_path).await.unwrap();
    // U+FEFF then a GetBindingErrors request, exactly as a BOM-emitting
    // peer would send it.
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(b"{\"type\":\"GetBindingErrors\",\"data\":{\"requestId\":\"x\"}}\n");
    stream.write_all(&bytes).await.unwrap();
    stream.flush().await.unwrap();

    let replies = read_frames(&mut stream, 1).await;
    assert_eq!(replies[0]["requestId"], "x");
    assert_eq!(replies[0]["success"], true);

    harness.shutdown().await;
}

#[tokio::test]
async fn replies_preserve_request_order() {
    let harness = spawn_harness().await;

    let mut stream = UnixStream::connect(&harness.socket_path).await.unwrap();
    // Three pipelined requests in one write: replies must come back in
    // arrival order, one per request.
    let batch = b"{\"type\":\"GetVisualTree\",\"data\":{\"requestId\":\"a\",\"maxDepth\":2}}\n\
{\"type\":\"GetBindingErrors\",\"data\":{\"requestId\":\"b\"}}\n\
{\"type\":\"GetVisualTree\",\"data\":{\"requestId\":\"c\",\"maxDepth\":1}}\n";
    stream.write_all(batch).await.unwrap();
    stream.flush().await.unwrap();

    let replies = read_frames(&mut stream, 3).await;
    let ids: Vec<_> = replies
        .iter()
        .map(|r| r["requestId"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    for reply in &replies {
        assert_eq!(reply["success"], true);
    }

    harness.shutdown().await;
}

#[tokio::test]
async fn crlf_terminated_frame_is_tolerated() {
    let harness = spawn_harness().await;

    let mut stream = UnixStream::connect(&harness.socket_path).await.unwrap();
    stream
        .write_all(b"{\"type\":\"GetBindingErrors\",\"data\":{\"requestId\":\"crlf\"}}\r\n")
        .await
        .unwrap();
    stream.flush().await.unwrap();

    let replies = read_frames(&mut stream, 1).await;
    assert_eq!(replies[0]["requestId"], "crlf");
    assert_eq!(replies[0]["success"], true);

    harness.shutdown().await;
}

#[tokio::test]
async fn unknown_request_kind_is_invalid_request() {
    let harness = spawn_harness().await;

    let mut stream = UnixStream::connect(&harness.socket_path).await.unwrap();
    stream
        .write_all(b"{\"type\":\"FlushCaches\",\"data\":{\"requestId\":\"q\"}}\n")
        .await
        .unwrap();
    stream.flush().await.unwrap();

    let replies = read_frames(&mut stream, 1).await;
    assert_eq!(replies[0]["success"], false);
    assert_eq!(replies[0]["requestId"], "");
    assert!(replies[0]["error"]
        .as_str()
        .unwrap()
        .starts_with("InvalidRequest"));

    harness.shutdown().await;
}

#[tokio::test]
async fn second_client_is_served_after_first_disconnects() {
    let harness = spawn_harness().await;

    {
        let mut first = UnixStream::connect(&harness.socket_path).await.unwrap();
        first
            .write_all(b"{\"type\":\"GetBindingErrors\",\"data\":{\"requestId\":\"one\"}}\n")
            .await
            .unwrap();
        let replies = read_frames(&mut first, 1).await;
        assert_eq!(replies[0]["requestId"], "one");
        // Dropped here: the endpoint loops back to accept.
    }

    let mut second = UnixStream::connect(&harness.socket_path).await.unwrap();
    second
        .write_all(b"{\"type\":\"GetBindingErrors\",\"data\":{\"requestId\":\"two\"}}\n")
        .await
        .unwrap();
    let replies = read_frames(&mut second, 1).await;
    assert_eq!(replies[0]["requestId"], "two");

    harness.shutdown().await;
}
