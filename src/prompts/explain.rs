use crate::llm::Prompt;

use super::{CURRENCY_LINE, JSON_RULE};

const INTRO: &str = "Vous êtes un assistant IA aidant les gestionnaires à comprendre les tendances des coûts et les dépassements de budget au Maroc.";

/// Decision-support prompt built from two free-text descriptions.
pub fn build_explain_prompt(cost_trends: &str, budget_variance: &str) -> Prompt {
    let system = format!("{INTRO} {CURRENCY_LINE}\n{JSON_RULE}");
    let user = format!(
        "Fournissez une explication claire et concise basée sur les informations suivantes :\n\nTendances des coûts : {cost_trends}\nÉcart budgétaire : {budget_variance}\n\nFormat de réponse :\n{{\"explanation\": \"...\"}}\n"
    );
    Prompt {
        system: Some(system),
        user,
    }
}
