use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Passage name; doubles as the link target and the aggregate key.
pub type PassageId = String;

/// Media descriptor of one passage, keyed by directive tag name.
pub type MediaMap = BTreeMap<String, MediaValue>;

/// AI-context descriptor of one passage, keyed by directive tag name.
pub type AiMap = BTreeMap<String, AiValue>;

/// Aggregate output: every compiled passage keyed by its id.
///
/// Keys serialize in sorted order, not in story order.
pub type StoryDef = BTreeMap<PassageId, CompiledPassage>;

/// One raw passage as handed over by the story reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    pub id: PassageId,
    pub raw_text: String,
}

impl Passage {
    pub fn new(id: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            raw_text: raw_text.into(),
        }
    }
}

/// Closed set of `{{TAG: content}}` directive names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DirectiveTag {
    Img,
    Audio,
    Video,
    VideoBg,
    IaContext,
    IaPrompt,
    IaReaction,
    Chars,
    Router,
    SceneStart,
    Show,
    Hide,
}

impl DirectiveTag {
    pub const ALL: [DirectiveTag; 12] = [
        DirectiveTag::Img,
        DirectiveTag::Audio,
        DirectiveTag::Video,
        DirectiveTag::VideoBg,
        DirectiveTag::IaContext,
        DirectiveTag::IaPrompt,
        DirectiveTag::IaReaction,
        DirectiveTag::Chars,
        DirectiveTag::Router,
        DirectiveTag::SceneStart,
        DirectiveTag::Show,
        DirectiveTag::Hide,
    ];

    /// Tag name exactly as authors write it.
    pub fn name(self) -> &'static str {
        match self {
            DirectiveTag::Img => "IMG",
            DirectiveTag::Audio => "AUDIO",
            DirectiveTag::Video => "VIDEO",
            DirectiveTag::VideoBg => "VIDEO_BG",
            DirectiveTag::IaContext => "IA_CONTEXT",
            DirectiveTag::IaPrompt => "IA_PROMPT",
            DirectiveTag::IaReaction => "IA_REACTION",
            DirectiveTag::Chars => "CHARS",
            DirectiveTag::Router => "ROUTER",
            DirectiveTag::SceneStart => "SCENE_START",
            DirectiveTag::Show => "SHOW",
            DirectiveTag::Hide => "HIDE",
        }
    }

    /// Look up a tag by its exact (case-sensitive) name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.name() == name)
    }

    /// True for tags whose spans are lifted out of the display text.
    ///
    /// Staging cues (`SCENE_START`, `SHOW`, `HIDE`) stay inline for the renderer.
    pub fn is_hidden(self) -> bool {
        !matches!(self, DirectiveTag::SceneStart | DirectiveTag::Show | DirectiveTag::Hide)
    }

    /// AI-context tags are the ones whose name carries `IA`.
    pub fn is_ai_context(self) -> bool {
        self.name().contains("IA")
    }
}

/// One parsed `{{TAG: content}}` span. `content` is already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub tag: DirectiveTag,
    pub content: String,
}

/// Media entry: a plain value, or a list for multi-value tags like `CHARS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaValue {
    Single(String),
    List(Vec<String>),
}

/// Four-field routing directive evaluated by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterConfig {
    pub variable: String,
    pub value: String,
    pub target_true: PassageId,
    pub target_false: PassageId,
}

/// AI-context entry: free text, or the structured `ROUTER` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AiValue {
    Router(RouterConfig),
    Text(String),
}

/// Value assigned by a choice; `true`/`false` literals become flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    Flag(bool),
    Text(String),
}

impl StateValue {
    /// Coerce a raw literal: `true`/`false` in any case become flags, all else stays text.
    pub fn coerce(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("true") {
            StateValue::Flag(true)
        } else if raw.eq_ignore_ascii_case("false") {
            StateValue::Flag(false)
        } else {
            StateValue::Text(raw.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    pub variable: String,
    pub value: StateValue,
}

/// A player-facing option. `state_change` serializes as an explicit `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub target: PassageId,
    pub state_change: Option<StateChange>,
}

/// Normalized record for one passage, consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CompiledPassage {
    pub id: PassageId,
    pub text: String,
    #[serde(default)]
    pub media: MediaMap,
    #[serde(default)]
    pub ai: AiMap,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_names_round_trip_through_lookup() {
        for tag in DirectiveTag::ALL {
            assert_eq!(DirectiveTag::from_name(tag.name()), Some(tag));
        }
        assert_eq!(DirectiveTag::from_name("img"), None);
        assert_eq!(DirectiveTag::from_name("VIDEO_B"), None);
    }

    #[test]
    fn staging_tags_stay_visible() {
        let visible: Vec<_> = DirectiveTag::ALL.into_iter().filter(|t| !t.is_hidden()).collect();
        assert_eq!(
            visible,
            vec![DirectiveTag::SceneStart, DirectiveTag::Show, DirectiveTag::Hide]
        );
    }

    #[test]
    fn ai_tags_are_the_ia_family() {
        let ai: Vec<_> = DirectiveTag::ALL.into_iter().filter(|t| t.is_ai_context()).collect();
        assert_eq!(
            ai,
            vec![DirectiveTag::IaContext, DirectiveTag::IaPrompt, DirectiveTag::IaReaction]
        );
    }

    #[test]
    fn state_values_coerce_booleans_only() {
        assert_eq!(StateValue::coerce("true"), StateValue::Flag(true));
        assert_eq!(StateValue::coerce("False"), StateValue::Flag(false));
        assert_eq!(StateValue::coerce("TRUE"), StateValue::Flag(true));
        assert_eq!(StateValue::coerce("50"), StateValue::Text("50".into()));
        assert_eq!(StateValue::coerce("truth"), StateValue::Text("truth".into()));
    }

    #[test]
    fn missing_state_change_serializes_as_null() {
        let choice = Choice {
            label: "Salir".into(),
            target: "Salir".into(),
            state_change: None,
        };
        let json = serde_json::to_value(&choice).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "label": "Salir", "target": "Salir", "state_change": null })
        );
    }

    #[test]
    fn untagged_values_serialize_bare() {
        let change = StateChange {
            variable: "visto".into(),
            value: StateValue::Flag(true),
        };
        assert_eq!(
            serde_json::to_value(&change).unwrap(),
            serde_json::json!({ "variable": "visto", "value": true })
        );

        let router = AiValue::Router(RouterConfig {
            variable: "oro".into(),
            value: "50".into(),
            target_true: "Rico".into(),
            target_false: "Pobre".into(),
        });
        assert_eq!(
            serde_json::to_value(&router).unwrap(),
            serde_json::json!({
                "variable": "oro",
                "value": "50",
                "targetTrue": "Rico",
                "targetFalse": "Pobre"
            })
        );

        let chars = MediaValue::List(vec!["manuela".into(), "concha".into()]);
        assert_eq!(
            serde_json::to_value(&chars).unwrap(),
            serde_json::json!(["manuela", "concha"])
        );
    }

    #[test]
    fn compiled_passage_reads_back_from_json() {
        let json = r#"{
            "id": "Mercado",
            "text": "Hola",
            "media": { "IMG": "plaza", "CHARS": ["manuela"] },
            "ai": { "IA_CONTEXT": "calma" },
            "choices": [
                { "label": "Volver", "target": "Casa", "state_change": { "variable": "oro", "value": "50" } }
            ]
        }"#;
        let passage: CompiledPassage = serde_json::from_str(json).unwrap();
        assert_eq!(passage.media["IMG"], MediaValue::Single("plaza".into()));
        assert_eq!(passage.media["CHARS"], MediaValue::List(vec!["manuela".into()]));
        assert_eq!(passage.ai["IA_CONTEXT"], AiValue::Text("calma".into()));
        let change = passage.choices[0].state_change.as_ref().unwrap();
        assert_eq!(change.value, StateValue::Text("50".into()));
    }
}
