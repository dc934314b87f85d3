use crate::state::ProjectState;
use std::fmt::Write as _;

/// Display label for the wizard's gender field; unknown values pass through
/// unchanged.
pub fn gender_label(gender: &str) -> &str {
    match gender {
        "male" => "男性",
        "female" => "女性",
        "other" => "その他",
        _ => gender,
    }
}

/// Render the plan as the Markdown document users copy out of the final
/// wizard step. Section headings are always present; lines for unfilled
/// fields are omitted.
pub fn render_markdown(state: &ProjectState) -> String {
    let mut out = String::new();

    out.push_str("# 企画概要\n\n## 基本情報\n");
    if !state.genre.is_empty() {
        let _ = writeln!(out, "**ジャンル:** {}", state.genre);
    }
    if !state.keywords.is_empty() {
        let _ = writeln!(out, "**キーワード:** {}", state.keywords.join(", "));
    }
    if !state.concept.is_empty() {
        let _ = writeln!(out, "**企画コンセプト:**\n{}", state.concept);
    }

    out.push_str("\n## ターゲット\n");
    if !state.target.age_min.is_empty() || !state.target.age_max.is_empty() {
        let _ = writeln!(
            out,
            "**年齢層:** {}歳 〜 {}歳",
            state.target.age_min, state.target.age_max
        );
    }
    if !state.target.gender.is_empty() {
        let _ = writeln!(out, "**性別:** {}", gender_label(&state.target.gender));
    }
    if !state.target.occupation.is_empty() {
        let _ = writeln!(out, "**職業:** {}", state.target.occupation);
    }
    if !state.target.personality.is_empty() {
        let _ = writeln!(out, "**性格:** {}", state.target.personality);
    }

    out.push_str("\n## 使用シーン\n");
    if !state.scene.when.is_empty() {
        let _ = writeln!(out, "**利用タイミング:**\n{}", state.scene.when);
    }
    if !state.scene.r#where.is_empty() {
        let _ = writeln!(out, "**利用場所:**\n{}", state.scene.r#where);
    }

    out.push_str("\n## 機能\n");
    if let Some(main) = state.main_feature() {
        let _ = writeln!(out, "### メイン機能\n{main}");
    }
    let others: Vec<&String> = state
        .features
        .iter()
        .enumerate()
        .filter(|(i, _)| *i as i32 != state.main_feature_index)
        .map(|(_, f)| f)
        .collect();
    if !others.is_empty() {
        out.push_str("### その他の機能\n");
        for feature in others {
            let _ = writeln!(out, "- {feature}");
        }
    }

    out.trim_end().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
