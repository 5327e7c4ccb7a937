//! A full garden session driven by a scripted agent and a scripted user.
//!
//! Run with `cargo run -p haiku-core --example garden_session`.

use haiku_core::prelude::*;
use tracing::info;

const PROPOSALS: &[(&str, &str)] = &[
    (
        "call-1",
        r#"{"japanese":["古池や","蛙飛び込む","水の音"],"english":["An old silent pond","a frog jumps into the pond","splash! Silence again."],"selectedImage":"Ginkaku-ji_Silver_Pavilion_Kyoto_Japanese_Garden_Pond_Reflection.jpg"}"#,
    ),
    (
        "call-2",
        r#"{"japanese":["夜桜や","街の灯りに","浮かぶ花"],"english":["Night cherry blossoms","floating in the city lights"],"selectedImage":"sakura_at_night.png"}"#,
    ),
    (
        "call-3",
        r#"{"japanese":["富士の山","湖に映る","春の色"],"english":["Mount Fuji","mirrored in the lake","colours of spring"],"selectedImage":"Mount_Fuji_Lake_Reflection_Cherry_Blossoms_Sakura_Spring.jpg"}"#,
    ),
];

#[tokio::main]
async fn main() -> Result<()> {
    let config = GardenConfig::load(None)?;
    haiku_core::logging::init_logging(&config.logging)?;

    let session = GardenSession::new(&config).into_shared();

    let mut tools = ToolSet::new();
    tools.add(GenerateHaikuTool::new(session.clone(), config.tool_name.clone()));

    for def in tools.definitions().await {
        info!("Tool available: {} - {}", def.name, def.description);
    }

    // The "user" approves everything except the second proposal
    let (tx, mut rx) = tokio::sync::mpsc::channel::<DecisionRequest>(8);
    let user = tokio::spawn(async move {
        while let Some(request) = rx.recv().await {
            let decision = if request.review_id == "call-2" {
                Decision::Reject
            } else {
                Decision::Approve
            };
            info!("User says {:?} to {}", decision, request.review_id);
            request.respond(decision);
        }
    });
    let source = ChannelDecisionSource::new(tx);

    for (call_id, arguments) in PROPOSALS {
        // Stream the arguments in a few pieces, like an agent would
        let chars: Vec<char> = arguments.chars().collect();
        let mut streamed = String::new();
        for piece in chars.chunks(40) {
            streamed.extend(piece);
            tools.preview(&config.tool_name, call_id, &streamed).await?;
        }

        let confirmation = tools.call(&config.tool_name, call_id, arguments).await?;
        info!("Agent transcript: {}", confirmation);

        let transition = settle(&session, call_id, &source).await?;
        info!("{} -> {:?}", call_id, transition);
    }
    drop(source);
    user.await.map_err(|e| Error::Internal(e.to_string()))?;

    let approved: Vec<ApprovedHaiku> = session.lock().gallery().approved().to_vec();
    if let Some(oldest) = approved.last() {
        session.lock().select(&oldest.id);
    }

    let session = session.lock();
    println!("Haiku Garden ({} approved)", session.gallery().len());
    for haiku in session.gallery().approved() {
        println!("- {} [{}]", haiku.created_at.format("%Y-%m-%d"), haiku.image_path);
        for (ja, en) in haiku.verses() {
            println!("    {}  /  {}", ja, en);
        }
    }
    println!("On display: {}", session.gallery().active().japanese_lines.join(" "));

    Ok(())
}
