use crate::game::{GameStatus, SessionState};
use crate::state::Context;

/// Reveal yesterday's secret word
#[poise::command(slash_command, guild_only)]
pub async fn yesterday(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    let channel_id = ctx.channel_id().get().to_string();
    let session = ctx.data().games.yesterday_for_channel(&channel_id)?;
    let status = session.status().await?;

    ctx.say(format_yesterday(session.secret(), &status)).await?;
    Ok(())
}

pub(super) fn format_yesterday(secret: &str, status: &GameStatus) -> String {
    let mut output = format!("Yesterday's secret word was **{}**.", secret);
    match status.state {
        SessionState::NoGuesses => output.push_str("\nNobody here guessed it."),
        SessionState::InProgress => output.push_str(&format!(
            "\nThis channel tried **{}** guesses without finding it.",
            status.guesses.len()
        )),
        SessionState::Found => {
            let winner = status
                .winner()
                .map(|g| g.user.name.as_str())
                .unwrap_or("someone");
            output.push_str(&format!(
                "\n{} found it; this channel made **{}** guesses.",
                winner,
                status.guesses.len()
            ));
        }
    }
    output
}
