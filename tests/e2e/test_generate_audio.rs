use crate::e2e::helpers;

use helpers::stub_engines::{StubBehavior, StubEngine};
use helpers::{ServerOptions, TestContext, TestServer};
use hound::WavReader;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use std::io::Cursor;
use std::time::Duration;
use test_context::test_context;
use voice_design_service::infrastructure::engines::EngineError;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_generate_wav_with_default_language(ctx: &TestContext) {
    let response = ctx
        .client
        .post_query(
            "/generate_audio",
            &[("text", "你好世界"), ("instruct", "温柔的女声")],
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "audio/wav")
        .assert_header(
            "content-disposition",
            "attachment; filename=generated_audio.wav",
        )
        .assert_header("x-sample-rate", "16000")
        .assert_header("x-audio-duration-ms", "1000");

    // 44-byte header + one second of 16 kHz mono 16-bit PCM
    assert_eq!(response.body_bytes.len(), 44 + 32_000);

    let call = ctx.engine.last_call().expect("engine was not called");
    assert_eq!(call.text, "你好世界");
    assert_eq!(call.language, "Chinese");
    assert_eq!(call.instruct, "温柔的女声");
    assert_eq!(ctx.engine.call_count(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_encode_engine_metadata_in_wav_header(ctx: &TestContext) {
    let response = ctx
        .client
        .post_query(
            "/generate_audio",
            &[("text", "Hello"), ("language", "English"), ("instruct", "deep male voice")],
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let reader = WavReader::new(Cursor::new(response.body_bytes.clone())).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.sample_rate, 16_000);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(reader.len(), 16_000);

    let decoded: Vec<i32> = reader.into_samples::<i32>().map(Result::unwrap).collect();
    assert_eq!(decoded, helpers::stub_engines::one_second_sine_16k());

    assert_eq!(ctx.engine.last_call().unwrap().language, "English");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_default_blank_language(ctx: &TestContext) {
    let response = ctx
        .client
        .post_query(
            "/generate_audio",
            &[("text", "你好"), ("language", "  "), ("instruct", "活泼的童声")],
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.engine.last_call().unwrap().language, "Chinese");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_identical_audio_for_identical_requests(ctx: &TestContext) {
    let params = [("text", "同样的输入"), ("instruct", "平静的男声")];

    let first = ctx.client.post_query("/generate_audio", &params).await.unwrap();
    let second = ctx.client.post_query("/generate_audio", &params).await.unwrap();

    first.assert_status(StatusCode::OK);
    second.assert_status(StatusCode::OK);
    assert_eq!(first.body_bytes, second.body_bytes);
    assert_eq!(ctx.engine.call_count(), 2);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_empty_text(ctx: &TestContext) {
    let response = ctx
        .client
        .post_query("/generate_audio", &[("text", ""), ("instruct", "anything")])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("text");
    assert_eq!(ctx.engine.call_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_query_as_json(ctx: &TestContext) {
    let response = ctx
        .client
        .post_query(
            "/generate_audio",
            &[("text", "a"), ("text", "b"), ("instruct", "calm")],
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("query string");
    assert_eq!(ctx.engine.call_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_missing_text(ctx: &TestContext) {
    let response = ctx
        .client
        .post_query("/generate_audio", &[("instruct", "anything")])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("text");
    assert_eq!(ctx.engine.call_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_missing_instruct(ctx: &TestContext) {
    let response = ctx
        .client
        .post_query("/generate_audio", &[("text", "你好世界")])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("instruct");
    assert_eq!(ctx.engine.call_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_blank_instruct(ctx: &TestContext) {
    let response = ctx
        .client
        .post_query("/generate_audio", &[("text", "你好世界"), ("instruct", " \t ")])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("instruct");
    assert_eq!(ctx.engine.call_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_request_without_parameters(ctx: &TestContext) {
    let response = ctx.client.post_query("/generate_audio", &[]).await.unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(ctx.engine.call_count(), 0);
}

#[tokio::test]
async fn it_should_reject_text_over_limit() {
    let server = TestServer::spawn(
        StubEngine::new(StubBehavior::Sine),
        ServerOptions {
            max_text_chars: 10,
            ..ServerOptions::default()
        },
    )
    .await;

    let response = server
        .client
        .post_query(
            "/generate_audio",
            &[("text", "this text is longer than ten"), ("instruct", "calm")],
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::PAYLOAD_TOO_LARGE)
        .assert_error_message("10 characters");
    assert_eq!(server.engine.call_count(), 0);
}

#[tokio::test]
async fn it_should_return_500_when_engine_fails() {
    let server = TestServer::spawn(
        StubEngine::new(StubBehavior::Fail(EngineError::Rejected(
            "unsupported language: Elvish".to_string(),
        ))),
        ServerOptions::default(),
    )
    .await;

    let response = server
        .client
        .post_query(
            "/generate_audio",
            &[("text", "Mae govannen"), ("language", "Elvish"), ("instruct", "airy")],
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("unsupported language: Elvish");
    assert_ne!(
        response.header("content-type").map(String::as_str),
        Some("audio/wav")
    );
    assert_eq!(server.engine.call_count(), 1);
}

#[tokio::test]
async fn it_should_fail_with_timeout_when_engine_hangs() {
    let server = TestServer::spawn(
        StubEngine::new(StubBehavior::Hang(Duration::from_secs(10))),
        ServerOptions {
            synthesis_timeout: Duration::from_millis(100),
            ..ServerOptions::default()
        },
    )
    .await;

    let response = server
        .client
        .post_query("/generate_audio", &[("text", "你好"), ("instruct", "温柔")])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("timed out");
}

#[tokio::test]
async fn it_should_hide_engine_detail_in_production() {
    let server = TestServer::spawn(
        StubEngine::new(StubBehavior::Fail(EngineError::Internal(
            "RuntimeError: CUDA error at /opt/model/attention.py:211".to_string(),
        ))),
        ServerOptions {
            expose_error_detail: false,
            ..ServerOptions::default()
        },
    )
    .await;

    let response = server
        .client
        .post_query("/generate_audio", &[("text", "你好"), ("instruct", "温柔")])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("Audio generation failed");
    let message = response.body.as_ref().unwrap()["message"].as_str().unwrap();
    assert!(!message.contains("attention.py"));
}

#[tokio::test]
async fn it_should_serve_repeated_requests_from_cache() {
    let server = TestServer::spawn(
        StubEngine::new(StubBehavior::Sine),
        ServerOptions {
            cache_enabled: true,
            ..ServerOptions::default()
        },
    )
    .await;
    let params = [("text", "缓存"), ("instruct", "温柔")];

    let first = server.client.post_query("/generate_audio", &params).await.unwrap();
    let second = server.client.post_query("/generate_audio", &params).await.unwrap();

    first.assert_status(StatusCode::OK);
    second.assert_status(StatusCode::OK);
    assert_eq!(first.body_bytes, second.body_bytes);
    assert_eq!(server.engine.call_count(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_echo_caller_request_id(ctx: &TestContext) {
    let response = ctx
        .client
        .post_query_with_headers(
            "/generate_audio",
            &[("text", "你好"), ("instruct", "温柔")],
            &[("x-request-id", "trace-1234")],
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("x-request-id", "trace-1234");
}
