//! Hand-authored guideline content merged into every rule document.

pub const PROHIBITED_USE_POLICY_URL: &str = "https://policies.google.com/terms/generative-ai";

pub const POLICY_NOTES: &[&str] = &[
    "他者の権利を侵害する画像の生成は禁止。",
    "安全ポリシー・使用禁止ポリシーの順守が必要。",
];

/// Attached to the input format only when the documentation mentions inline binary data.
pub const INLINE_DATA_NOTE: &str = "画像は inlineData.mimeType と base64(data) で渡す。";

pub const DESCRIBE_SUBJECTS: &[&str] = &[
    "被写体（年齢/性別/ポーズ/表情）",
    "構図（クローズアップ/全身/俯瞰/対角など）",
    "背景/環境（屋内/屋外/時刻/天候/質感）",
    "光（柔らかい/硬い/逆光/リムライト/色温度）",
    "スタイル（現実的/アニメ/イラスト/画家・写真家の流儀）",
    "色/ムード（鮮やか/パステル/モノトーン/神秘的）",
    "追加要素（粒子/発光/モーションの雰囲気）",
];

pub const KEEP_IN_MIND: &[&str] = &[
    "要求は具体的かつ簡潔に。禁止事項や権利に配慮する。",
    "編集の場合：『何を』『どう変えるか』を明確に（追加/削除/色/質感/形）。",
    "複数画像の場合：『役割』を明記（構図参照/スタイル参照 など）。",
    "対話を重ねて徐々に調整する（マルチターン編集）。",
];

pub const TEXT_TO_IMAGE_PROMPT: &str = "A concise, vivid description of the desired image with key attributes (subject, setting, lighting, style, mood).";

pub const IMAGE_EDIT_PROMPT: &str =
    "Describe precise edits to apply to the uploaded image (what-to-change and how).";

pub const BASE64_PLACEHOLDER: &str = "<BASE64_IMAGE>";

/// Shape of the `contents` array accepted by the image generation API.
pub fn contents_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "array",
        "description": "ユーザーとシステムのパーツ列。画像は inlineData で base64+MIME を指定。",
        "items": {
            "oneOf": [
                { "type": "string", "description": "テキストパート" },
                {
                    "type": "object",
                    "description": "画像パート",
                    "properties": {
                        "inlineData": {
                            "type": "object",
                            "properties": {
                                "mimeType": { "type": "string", "description": "例: image/png, image/jpeg" },
                                "data": { "type": "string", "description": "base64エンコード画像データ" }
                            },
                            "required": ["mimeType", "data"]
                        }
                    },
                    "required": ["inlineData"]
                }
            ]
        }
    })
}
