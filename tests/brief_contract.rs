//! Contract tests for the research chat client
//!
//! These pin the behavior the backend and the UI both rely on: the
//! classification heuristics, the /brief payload shape, the dual-shape
//! response tolerance, and the session clear semantics.

use brief_chat::classify::{classify_depth, is_follow_up, DepthChoice, ResearchDepth};
use brief_chat::client::{parse_brief_response, BriefRequest, ResearchBrief};
use brief_chat::render::render_brief;
use brief_chat::session::SessionState;

// ============================================================================
// Classification Contract
// ============================================================================

#[test]
fn contract_follow_up_requires_history() {
    // Nothing is a follow-up without prior conversation
    let inputs = [
        "tell me more",
        "elaborate on it",
        "and what about that topic",
    ];
    for input in inputs {
        assert!(!is_follow_up(input, 0), "False follow-up on: {}", input);
    }
}

#[test]
fn contract_follow_up_continuation_phrases() {
    assert!(is_follow_up("please elaborate", 1), "'elaborate' should match");
    assert!(is_follow_up("tell me more", 1), "'tell me more' should match");
}

#[test]
fn contract_follow_up_short_pronoun_fallback() {
    // Short pronoun-bearing inputs count even without an explicit cue
    assert!(is_follow_up("why does it matter", 1));
    assert!(is_follow_up("is this still true", 1));
}

#[test]
fn contract_depth_is_total() {
    assert_eq!(classify_depth("quick overview"), ResearchDepth::Quick);
    assert_eq!(classify_depth("comprehensive deep dive"), ResearchDepth::Deep);
    assert_eq!(classify_depth("tell me about fusion power"), ResearchDepth::Medium);
}

#[test]
fn contract_depth_shallow_cue_precedence() {
    // Conflicting cues resolve shallow; this precedence is deliberate
    assert_eq!(classify_depth("quick but comprehensive"), ResearchDepth::Quick);
}

// ============================================================================
// Payload Contract
// ============================================================================

#[test]
fn contract_auto_submission_payload() {
    // Auto selector, empty history: depth 2, no follow-up, literal topic
    let session = SessionState::new();
    let input = "Research the impact of AI on healthcare";

    let depth = DepthChoice::Auto.resolve(input);
    let follow_up = is_follow_up(input, session.history().len());

    let request = BriefRequest {
        topic: input.to_string(),
        depth: depth.as_int(),
        follow_up,
        user_id: session.user_id().to_string(),
        conversation_history: session.context_for_request(),
    };

    assert_eq!(request.depth, 2, "unmarked topic should default to medium");
    assert!(!request.follow_up, "empty history cannot be a follow-up");

    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["topic"], input, "topic must be the literal input");
    assert_eq!(json["conversation_history"].as_array().unwrap().len(), 0);
    assert!(!json["user_id"].as_str().unwrap().is_empty());
}

#[test]
fn contract_history_caps() {
    let mut session = SessionState::new();
    let brief = ResearchBrief {
        executive_summary: Some("s".repeat(600)),
        ..Default::default()
    };
    session.record_exchange("first question", &brief, false, ResearchDepth::Medium);

    // Cached at 300 chars + ellipsis marker
    let cached = &session.history()[0].response;
    assert!(cached.ends_with("..."), "overflowing cache needs a marker");
    assert_eq!(cached.chars().count(), 303);

    // Outbound cap is independent, at 500 chars
    let context = session.context_for_request();
    assert!(context[0].response.chars().count() <= 500);
}

#[test]
fn contract_clear_is_atomic() {
    let mut session = SessionState::new();
    session.push_user_message("q");
    session.push_assistant_message("a", None);
    session.record_exchange("q", &ResearchBrief::default(), false, ResearchDepth::Quick);

    session.clear();

    assert!(session.messages().is_empty(), "messages must clear");
    assert!(session.history().is_empty(), "history must clear with it");
}

// ============================================================================
// Response Shape Contract
// ============================================================================

#[test]
fn contract_wrapped_brief_renders() {
    // The backend may wrap the brief; empty sources must not fail
    let body = r#"{"final_brief": {"topic": "X", "sources": []}}"#;
    let brief = parse_brief_response(body).expect("wrapped shape must parse");

    let rendered = render_brief(&brief);
    assert!(rendered.contains("X"));
}

#[test]
fn contract_bare_brief_renders() {
    let body = r#"{"topic": "Y", "executive_summary": "short"}"#;
    let brief = parse_brief_response(body).expect("bare shape must parse");
    assert_eq!(brief.topic.as_deref(), Some("Y"));
    assert!(render_brief(&brief).contains("short"));
}

#[test]
fn contract_missing_fields_render_placeholders() {
    let brief = parse_brief_response("{}").unwrap();
    let rendered = render_brief(&brief);
    assert!(rendered.contains("Research Topic"));
    assert!(rendered.contains("No summary available."));
    assert!(rendered.contains("N/A"));
}
