use tracing::info;

use super::player;
use crate::game::GiveUpReport;
use crate::render::render_duration;
use crate::state::Context;

/// Give up on today's semantle
#[poise::command(slash_command, guild_only)]
pub async fn igiveup(
    ctx: Context<'_>,
    #[description = "Type confirm to verify"] confirm: String,
) -> Result<(), anyhow::Error> {
    if confirm != "confirm" {
        ctx.say("You really want to give up? Have to type `/igiveup confirm`")
            .await?;
        return Ok(());
    }

    let user = player(&ctx).await;
    let channel_id = ctx.channel_id().get().to_string();
    let report = ctx
        .data()
        .games
        .today_for_channel(&channel_id)?
        .give_up()
        .await?;

    info!(user = user.name, channel_id, guesses = report.guess_count, "Player gave up");

    ctx.say(format_give_up(&user.name, &report)).await?;
    Ok(())
}

pub(super) fn format_give_up(name: &str, report: &GiveUpReport) -> String {
    format!(
        "{} gave up! The secret word was **{}**.\nYou tried **{}** guesses.\nNext game will be ready in {}.",
        name,
        report.secret,
        report.guess_count,
        render_duration(report.time_until_next_ms)
    )
}
