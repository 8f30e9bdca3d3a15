//! Prompt templates sent to the model.
//!
//! Each template pins the persona (Moroccan cost control, amounts in
//! Dirham) and the exact JSON object the reply must be.

pub mod anomaly;
pub mod explain;
pub mod forecast;

const CURRENCY_LINE: &str = "La devise utilisée est le Dirham Marocain (DH).";
const JSON_RULE: &str = "Répondez UNIQUEMENT avec un objet JSON valide, sans texte autour ni balises markdown.";

/// Render a bullet list, one `- item` per line.
fn bullets(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
