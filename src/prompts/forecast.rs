use crate::llm::Prompt;

use super::{CURRENCY_LINE, JSON_RULE, bullets};

const INTRO: &str = "Vous êtes un analyste financier expert en prévision de coûts au Maroc.";
const TASK: &str = "Analysez les données de coûts historiques fournies pour prévoir les coûts futurs et identifier les dépassements budgétaires potentiels. Fournissez les coûts prévus au format CSV et un résumé de votre analyse, y compris les tendances clés et les recommandations.";
const RULES: &[&str] = &[
    "forecastedCosts DOIT être une chaîne CSV valide.",
    "Le CSV DOIT avoir deux colonnes : \"Date\" et \"Forecasted Cost\".",
    "Chaque valeur dans le CSV, y compris les en-têtes, DOIT être entourée de guillemets doubles.",
    "Tout guillemet double à l'intérieur d'une valeur DOIT être échappé par un autre guillemet double.",
    "Les dates sont au format AAAA-MM-JJ, une ligne par mois de l'horizon.",
    "analysisSummary met en évidence les tendances clés, les dépassements budgétaires potentiels et des recommandations concrètes.",
    "overrunWarning contient un avertissement si un dépassement de budget est détecté, sinon une chaîne vide.",
];
const EXAMPLE: &str = r#"{"forecastedCosts": "\"Date\",\"Forecasted Cost\"\n\"2024-07-01\",\"120000\"\n\"2024-08-01\",\"125000\"", "analysisSummary": "Les coûts suivent une tendance à la hausse portée par les matières premières.", "overrunWarning": "Un dépassement de budget est détecté pour le mois d'août."}"#;

/// Forecast prompt: historical CSV plus a horizon such as `"6 mois"`.
pub fn build_forecast_prompt(cost_data: &str, horizon: &str) -> Prompt {
    let system = format!("{INTRO} {CURRENCY_LINE}\n{JSON_RULE}");
    let user = format!(
        "{TASK}\n\nDonnées de coûts d'entrée (CSV) :\n{cost_data}\n\nHorizon de prévision : {horizon}\n\nInstructions de format de sortie :\n{rules}\n\nExemple de sortie :\n{EXAMPLE}\n",
        rules = bullets(RULES),
    );
    Prompt {
        system: Some(system),
        user,
    }
}
