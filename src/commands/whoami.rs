use anyhow::Result;
use async_trait::async_trait;

use super::{Command, CommandContext, CommandResult};

pub struct WhoamiCommand;

#[async_trait]
impl Command for WhoamiCommand {
    fn name(&self) -> &str {
        "/whoami"
    }

    fn description(&self) -> &str {
        "show provider, model, auth status and settings"
    }

    async fn execute(&self, _args: &str, ctx: &mut CommandContext<'_>) -> Result<CommandResult> {
        println!("  provider  {} ({})", ctx.model.provider(), ctx.model.model());
        println!("  auth      {}", ctx.auth_status);
        println!("  horizon   {}", ctx.settings.horizon);
        println!("  fixed     {}", crate::render::format_currency(ctx.settings.fixed_cost));
        println!("  db        {}", ctx.db_path);
        Ok(CommandResult::Handled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::Fixture;

    #[tokio::test]
    async fn returns_handled() {
        let mut fx = Fixture::new(vec![]);
        assert!(matches!(
            WhoamiCommand.execute("", &mut fx.ctx()).await.unwrap(),
            CommandResult::Handled
        ));
    }

    #[test]
    fn metadata() {
        assert_eq!(WhoamiCommand.name(), "/whoami");
        assert!(WhoamiCommand.aliases().is_empty());
    }
}
