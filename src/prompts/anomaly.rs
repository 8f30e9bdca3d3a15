use crate::llm::Prompt;

use super::{CURRENCY_LINE, JSON_RULE, bullets};

const INTRO: &str = "Vous êtes un assistant IA spécialisé dans la détection d'anomalies financières au Maroc.";
const TASK: &str = "Analysez les données de coûts fournies et identifiez toute fluctuation ou anomalie inhabituelle. Fournissez un rapport résumant les anomalies détectées, y compris les raisons potentielles et la gravité.";
const RULES: &[&str] = &[
    "anomalyReport est rédigé pour être facilement compréhensible par un contrôleur de coûts.",
    "anomalyReport liste les anomalies avec une description, les raisons potentielles et la gravité.",
    "anomalyReport reprend la description et les informations sur les données de coûts.",
    "anomalyReport se termine par un résumé des conclusions et des recommandations.",
    "decisionSupportMessage est un message concis qui suggère des actions ou des enquêtes basées sur les anomalies détectées.",
];
const SHAPE: &str = r#"{"anomalyReport": "...", "decisionSupportMessage": "..."}"#;

/// Anomaly prompt: historical CSV plus a short description of the data.
pub fn build_anomaly_prompt(cost_data: &str, description: &str) -> Prompt {
    let system = format!("{INTRO} {CURRENCY_LINE}\n{JSON_RULE}");
    let user = format!(
        "{TASK}\n\nDescription des données : {description}\nDonnées de coûts :\n{cost_data}\n\nConsignes :\n{rules}\n\nFormat de réponse :\n{SHAPE}\n",
        rules = bullets(RULES),
    );
    Prompt {
        system: Some(system),
        user,
    }
}
