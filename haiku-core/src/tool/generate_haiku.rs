//! The `generateHaiku` tool

use async_trait::async_trait;
use serde_json::Value;

use crate::proposal::HaikuProposal;
use crate::session::SharedSession;
use crate::tool::{Tool, ToolDefinition};

const PARAMETERS_TS: &str = "interface GenerateHaikuArgs {
  japanese: string[]; // three lines of the haiku in Japanese (5-7-5 syllables)
  english: string[]; // three lines of the haiku in English translation
  selectedImage: string; // image filename from the available options
}";

/// Proposes a haiku for the user to review.
///
/// Streamed arguments are forwarded to the session as previews; the final
/// call completes the proposal and answers with the confirmation message.
pub struct GenerateHaikuTool {
    session: SharedSession,
    name: String,
}

impl GenerateHaikuTool {
    /// Create the tool for a session under the given name
    pub fn new(session: SharedSession, name: impl Into<String>) -> Self {
        Self {
            session,
            name: name.into(),
        }
    }

    fn parameters() -> Value {
        let gen = schemars::gen::SchemaSettings::openapi3().into_generator();
        let schema = gen.into_root_schema_for::<HaikuProposal>();
        let mut parameters = serde_json::to_value(schema).unwrap_or(serde_json::json!({
            "type": "object",
            "properties": {}
        }));
        if let Some(object) = parameters.as_object_mut() {
            object.insert(
                "required".to_string(),
                serde_json::json!(["japanese", "english", "selectedImage"]),
            );
        }
        parameters
    }
}

#[async_trait]
impl Tool for GenerateHaikuTool {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn definition(&self) -> ToolDefinition {
        let images = {
            let session = self.session.lock();
            session.catalog().iter().collect::<Vec<_>>().join(", ")
        };

        ToolDefinition {
            name: self.name(),
            description: format!(
                "Generate a beautiful haiku in Japanese with English translation, and select the most appropriate image from these available options: {}",
                images
            ),
            parameters: Self::parameters(),
            parameters_ts: Some(PARAMETERS_TS.to_string()),
        }
    }

    async fn preview(&self, call_id: &str, partial_arguments: &str) -> anyhow::Result<()> {
        self.session.lock().stream_arguments(call_id, partial_arguments);
        Ok(())
    }

    async fn call(&self, call_id: &str, arguments: &str) -> anyhow::Result<String> {
        let outcome = self.session.lock().complete_proposal(call_id, arguments);
        Ok(outcome.confirmation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::GardenSession;

    #[tokio::test]
    async fn test_definition() {
        let tool = GenerateHaikuTool::new(GardenSession::default().into_shared(), "generateHaiku");
        let def = tool.definition().await;

        assert_eq!(def.name, "generateHaiku");
        assert!(def
            .description
            .contains("Tokyo_Skyline_Night_Tokyo_Tower_Mount_Fuji_View.jpg"));
        assert_eq!(
            def.parameters["required"],
            serde_json::json!(["japanese", "english", "selectedImage"])
        );
        let properties = def.parameters["properties"].as_object().unwrap();
        assert!(properties.contains_key("japanese"));
        assert!(properties.contains_key("english"));
        assert!(properties.contains_key("selectedImage"));
        assert!(def.parameters_ts.unwrap().contains("selectedImage: string"));
    }

    #[tokio::test]
    async fn test_call_opens_review() {
        let session = GardenSession::default().into_shared();
        let tool = GenerateHaikuTool::new(session.clone(), "generateHaiku");

        tool.preview("call-7", r#"{"japanese":["古池や"#).await.unwrap();
        assert!(!session.lock().review("call-7").unwrap().controls_active());

        let confirmation = tool
            .call(
                "call-7",
                r#"{"japanese":["古池や","蛙飛び込む","水の音"],"english":["old pond","a frog jumps in","sound of water"],"selectedImage":"missing.jpg"}"#,
            )
            .await
            .unwrap();

        assert_eq!(
            confirmation,
            "Generated haiku with selected image: Bonsai_Tree_Potted_Japanese_Art_Green_Foliage.jpeg"
        );
        assert!(session.lock().review("call-7").unwrap().controls_active());
    }
}
