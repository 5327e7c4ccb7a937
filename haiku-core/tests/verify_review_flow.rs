use haiku_core::prelude::*;
use std::time::Duration;

const ARGS: &str = r#"{"japanese":["古池や","蛙飛び込む","水の音"],"english":["old pond","a frog jumps in","sound of water"],"selectedImage":"Takachiho_Gorge_Waterfall_River_Lush_Greenery_Japan.jpg"}"#;

fn toolset(session: &SharedSession) -> ToolSet {
    let mut tools = ToolSet::new();
    tools.add(GenerateHaikuTool::new(session.clone(), "generateHaiku"));
    tools
}

#[tokio::test]
async fn test_streamed_call_then_channel_approval() {
    let session = GardenSession::default().into_shared();
    let tools = toolset(&session);

    // Arguments arrive in pieces before the call completes
    let chars: Vec<char> = ARGS.chars().collect();
    let mut streamed = String::new();
    for piece in chars.chunks(16) {
        streamed.extend(piece);
        tools.preview("generateHaiku", "call-1", &streamed).await.unwrap();
        assert!(!session.lock().review("call-1").unwrap().controls_active());
    }

    let confirmation = tools.call("generateHaiku", "call-1", ARGS).await.unwrap();
    assert_eq!(
        confirmation,
        "Generated haiku with selected image: Takachiho_Gorge_Waterfall_River_Lush_Greenery_Japan.jpg"
    );

    let (tx, mut rx) = tokio::sync::mpsc::channel(4);
    let display = tokio::spawn(async move {
        let request: DecisionRequest = rx.recv().await.unwrap();
        assert_eq!(request.review_id, "call-1");
        assert_eq!(request.record.japanese_lines[0], "古池や");
        request.respond(Decision::Approve)
    });

    let source = ChannelDecisionSource::new(tx);
    let transition = settle(&session, "call-1", &source).await.unwrap();
    assert!(display.await.unwrap());

    let Transition::Approved(haiku) = transition else {
        panic!("expected approval, got {:?}", transition);
    };
    let guard = session.lock();
    assert_eq!(guard.gallery().active(), &haiku);
    assert!(haiku.image_path.ends_with("Takachiho_Gorge_Waterfall_River_Lush_Greenery_Japan.jpg"));
}

#[tokio::test]
async fn test_dropped_request_abandons_review() {
    let session = GardenSession::default().into_shared();
    session.lock().complete_proposal("call-1", ARGS);

    let (tx, mut rx) = tokio::sync::mpsc::channel::<DecisionRequest>(1);
    let display = tokio::spawn(async move {
        // user closes the panel without answering
        drop(rx.recv().await);
    });

    let source = ChannelDecisionSource::new(tx);
    let transition = settle(&session, "call-1", &source).await.unwrap();
    display.await.unwrap();

    assert_eq!(transition, Transition::Abandoned);
    let guard = session.lock();
    assert!(guard.gallery().is_empty());
    assert!(guard.review("call-1").unwrap().controls_active());
}

#[tokio::test]
async fn test_closed_channel_is_an_error() {
    let session = GardenSession::default().into_shared();
    session.lock().complete_proposal("call-1", ARGS);

    let (tx, rx) = tokio::sync::mpsc::channel::<DecisionRequest>(1);
    drop(rx);

    let source = ChannelDecisionSource::new(tx);
    let result = settle(&session, "call-1", &source).await;
    assert!(matches!(result, Err(Error::DecisionChannel(_))));
    assert_eq!(session.lock().pending_reviews().count(), 1);
}

#[tokio::test]
async fn test_second_decision_is_noop() {
    let session = GardenSession::default().into_shared();
    session.lock().complete_proposal("call-1", ARGS);

    let (tx, mut rx) = tokio::sync::mpsc::channel::<DecisionRequest>(4);
    let display = tokio::spawn(async move {
        while let Some(request) = rx.recv().await {
            request.respond(Decision::Approve);
        }
    });

    let source = ChannelDecisionSource::new(tx);
    let first = settle(&session, "call-1", &source).await.unwrap();
    let second = tokio::time::timeout(Duration::from_secs(1), settle(&session, "call-1", &source))
        .await
        .expect("an already decided review must not wait for the display")
        .unwrap();

    assert!(first.is_applied());
    assert!(matches!(second, Transition::AlreadyDecided(ReviewState::Approved { .. })));
    assert_eq!(session.lock().gallery().len(), 1);

    drop(source);
    display.await.unwrap();
}

#[tokio::test]
async fn test_events_reach_subscribers() {
    let session = GardenSession::default().into_shared();
    let mut events = session.lock().subscribe();
    let tools = toolset(&session);

    tools.preview("generateHaiku", "call-1", r#"{"japanese":["古池や"]"#).await.unwrap();
    tools.call("generateHaiku", "call-1", ARGS).await.unwrap();
    session.lock().reject("call-1");

    assert!(matches!(events.recv().await.unwrap(), GardenEvent::ProposalStreaming { .. }));
    assert!(matches!(events.recv().await.unwrap(), GardenEvent::ProposalReady { .. }));
    assert!(matches!(events.recv().await.unwrap(), GardenEvent::Rejected { .. }));
}

#[tokio::test]
async fn test_unknown_tool() {
    let session = GardenSession::default().into_shared();
    let tools = toolset(&session);

    let result = tools.call("drawPicture", "call-1", "{}").await;
    assert!(matches!(result, Err(Error::ToolNotFound(name)) if name == "drawPicture"));
}
