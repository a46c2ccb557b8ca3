//! Integration tests against the live Converse API.
//!
//! These tests call real AWS APIs and require valid credentials with
//! Bedrock model access in `us-east-1`.
//!
//! Run with: `cargo test -p solace-bedrock --test live_oracle -- --ignored`

use solace_bedrock::client::build_client;
use solace_bedrock::screening::{correct_transcript, score_answer, summarize_analysis};
use solace_core::models::language::Language;

const MODEL_ID: &str = "us.anthropic.claude-haiku-4-5-20251001-v1:0";

async fn client() -> aws_sdk_bedrockruntime::Client {
    let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new("us-east-1"))
        .load()
        .await;
    build_client(&config)
}

#[tokio::test]
#[ignore]
async fn scores_a_strong_affirmation_high() {
    let client = client().await;
    let score = score_answer(
        &client,
        MODEL_ID,
        "Little interest or pleasure in doing things?",
        "Honestly, nearly every day. Nothing feels worth doing anymore.",
        Language::English,
    )
    .await
    .expect("score_answer should succeed");
    assert!((2..=3).contains(&score), "unexpected score {score}");
}

#[tokio::test]
#[ignore]
async fn summary_fits_the_limit() {
    let client = client().await;
    let text = "The user reports low mood most days for the past month, \
                trouble sleeping, and reduced appetite. ".repeat(10);
    let summary = summarize_analysis(&client, MODEL_ID, &text)
        .await
        .expect("summarize_analysis should succeed");
    assert!(!summary.is_empty());
    assert!(summary.chars().count() <= 300);
}

#[tokio::test]
#[ignore]
async fn correction_keeps_meaning() {
    let client = client().await;
    let corrected = correct_transcript(&client, MODEL_ID, "i am feel tired every days", Language::English)
        .await
        .expect("correct_transcript should succeed");
    assert!(corrected.to_lowercase().contains("tired"));
}
