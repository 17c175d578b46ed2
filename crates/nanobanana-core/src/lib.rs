pub mod rules;
pub mod signals;

use serde::{Deserialize, Serialize};

pub use signals::{extract_signals, Signals};

pub const RULES_VERSION: &str = "2025-09-02";
pub const DEFAULT_LANG: &str = "ja";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";

// --- Modes ---

/// Usage pattern of the image generation API, each with its own request template.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    TextToImage,
    ImageEdit,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::TextToImage, Mode::ImageEdit];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::TextToImage => "text_to_image",
            Mode::ImageEdit => "image_edit",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Arguments ---

/// Caller arguments with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleArgs {
    pub lang: String,
    pub model: String,
    pub mode: Option<Mode>,
}

impl RuleArgs {
    /// Apply the defaults for omitted arguments. An explicitly empty `lang` is kept
    /// as-is so the documentation site falls back to its own default language.
    pub fn resolve(lang: Option<String>, model: Option<String>, mode: Option<Mode>) -> Self {
        Self {
            lang: lang.unwrap_or_else(|| DEFAULT_LANG.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            mode,
        }
    }
}

impl Default for RuleArgs {
    fn default() -> Self {
        Self::resolve(None, None, None)
    }
}

// --- Rule document ---

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RuleDocument {
    pub version: &'static str,
    pub references: References,
    pub policies: Policies,
    pub modes_supported: Vec<Mode>,
    pub input_format: InputFormat,
    pub prompting_guidelines: PromptingGuidelines,
    pub template: Templates,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct References {
    /// URL the documentation snapshot was fetched from
    pub image_generation_doc: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Policies {
    pub content_rights_required: bool,
    pub prohibited_use_policy_url: String,
    pub synthid_watermark_expected: bool,
    pub notes: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InputFormat {
    pub model: String,
    pub contents_schema: serde_json::Value,
    /// Always present; empty when the documentation does not mention binary payloads.
    pub notes: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PromptingGuidelines {
    pub describe_subjects: &'static [&'static str],
    pub keep_in_mind: &'static [&'static str],
}

/// Example request bodies keyed by mode name. Absent modes are omitted from the output.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Templates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_to_image: Option<Template>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_edit: Option<Template>,
}

impl Templates {
    /// Templates for every supported mode.
    pub fn full(model: &str) -> Self {
        Self {
            text_to_image: Some(Template::for_mode(Mode::TextToImage, model)),
            image_edit: Some(Template::for_mode(Mode::ImageEdit, model)),
        }
    }

    /// Keep only the template for `mode`; `None` keeps everything.
    pub fn narrow(self, mode: Option<Mode>) -> Self {
        match mode {
            None => self,
            Some(Mode::TextToImage) => Self {
                text_to_image: self.text_to_image,
                image_edit: None,
            },
            Some(Mode::ImageEdit) => Self {
                text_to_image: None,
                image_edit: self.image_edit,
            },
        }
    }

    pub fn get(&self, mode: Mode) -> Option<&Template> {
        match mode {
            Mode::TextToImage => self.text_to_image.as_ref(),
            Mode::ImageEdit => self.image_edit.as_ref(),
        }
    }

    pub fn modes(&self) -> Vec<Mode> {
        Mode::ALL
            .into_iter()
            .filter(|m| self.get(*m).is_some())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Template {
    pub model: String,
    pub contents: Vec<Part>,
}

impl Template {
    pub fn for_mode(mode: Mode, model: &str) -> Self {
        let contents = match mode {
            Mode::TextToImage => vec![Part::Text(rules::TEXT_TO_IMAGE_PROMPT.to_string())],
            Mode::ImageEdit => vec![
                Part::Text(rules::IMAGE_EDIT_PROMPT.to_string()),
                Part::Inline {
                    inline_data: InlineData {
                        mime_type: "image/png".to_string(),
                        data: rules::BASE64_PLACEHOLDER.to_string(),
                    },
                },
            ],
        };
        Self {
            model: model.to_string(),
            contents,
        }
    }
}

/// One entry of a request's `contents` array: either plain text or an inline image.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Part {
    Text(String),
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// Merge the extracted signals, the static guideline content and the caller's
/// arguments into a rule document. Deterministic for identical inputs.
pub fn build_rule_document(source_url: &str, signals: &Signals, args: &RuleArgs) -> RuleDocument {
    let input_notes = if signals.mentions_binary_encoding {
        vec![rules::INLINE_DATA_NOTE]
    } else {
        vec![]
    };

    RuleDocument {
        version: RULES_VERSION,
        references: References {
            image_generation_doc: source_url.to_string(),
        },
        policies: Policies {
            content_rights_required: true,
            prohibited_use_policy_url: format!(
                "{}?hl={}",
                rules::PROHIBITED_USE_POLICY_URL,
                args.lang
            ),
            synthid_watermark_expected: signals.has_watermark_marker,
            notes: rules::POLICY_NOTES,
        },
        modes_supported: Mode::ALL.to_vec(),
        input_format: InputFormat {
            model: args.model.clone(),
            contents_schema: rules::contents_schema(),
            notes: input_notes,
        },
        prompting_guidelines: PromptingGuidelines {
            describe_subjects: rules::DESCRIBE_SUBJECTS,
            keep_in_mind: rules::KEEP_IN_MIND,
        },
        template: Templates::full(&args.model).narrow(args.mode),
    }
}
