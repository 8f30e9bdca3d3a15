//! Startup banner and session summary display.

use crate::consts::{AUTHOR, HOMEPAGE, REPO, format_number};
use crate::llm::TokenUsage;

/// Session configuration for display in the startup banner.
pub struct BannerInfo<'a> {
    pub provider: &'a str,
    pub model: &'a str,
    pub auth_status: &'a str,
    pub dataset: &'a str,
    pub horizon: &'a str,
}

/// Print the startup banner with session info.
pub fn print_banner(info: &BannerInfo) {
    println!(
        r#"
   ╔═══════════════════════════════════════╗
   ║           C O S T L E N S             ║
   ║   cost tracking, read by a model      ║
   ╚═══════════════════════════════════════╝

   version   {}
   by        {}
   home      {}
   repo      {}
   provider  {} ({})
   auth      {}
   data      {}
   horizon   {}

   type /help for commands
"#,
        env!("CARGO_PKG_VERSION"),
        AUTHOR,
        HOMEPAGE,
        REPO,
        info.provider,
        info.model,
        info.auth_status,
        info.dataset,
        info.horizon,
    );
}

/// Print the session summary (token usage + farewell).
pub fn print_session_summary(usage: TokenUsage) {
    if usage.total() > 0 {
        println!(
            "session: {:>6} input + {:>6} output = {:>6} tokens",
            format_number(usage.input_tokens),
            format_number(usage.output_tokens),
            format_number(usage.total()),
        );
    }
    println!("goodbye.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_banner_does_not_panic() {
        print_banner(&BannerInfo {
            provider: "groq",
            model: "llama-3.3-70b-versatile",
            auth_status: "not authenticated",
            dataset: "sample (24 records)",
            horizon: "6 mois",
        });
    }

    #[test]
    fn print_session_summary_with_tokens() {
        print_session_summary(TokenUsage {
            input_tokens: 1234,
            output_tokens: 567,
        });
    }

    #[test]
    fn print_session_summary_zero_tokens() {
        print_session_summary(TokenUsage::default());
    }
}
