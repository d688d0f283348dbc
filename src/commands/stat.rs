use super::send_chunked;
use crate::game::GameStatus;
use crate::render::{render_duration, render_table};
use crate::state::Context;

// 15 is about as many as discord will let us show in a single message
const MAX_ROWS: usize = 15;

/// Get current status of Semantle game
#[poise::command(slash_command, guild_only)]
pub async fn stat(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    let channel_id = ctx.channel_id().get().to_string();
    let session = ctx.data().games.today_for_channel(&channel_id)?;
    let status = session.status().await?;

    let reply = format_stat(session.time_since_start_ms(), &status);
    send_chunked(&ctx, &reply).await
}

pub(super) fn format_stat(time_since_start_ms: i64, status: &GameStatus) -> String {
    let guesses = &status.guesses;
    let mut output = format!(
        "The current game started **{}** ago.",
        render_duration(time_since_start_ms)
    );

    if guesses.is_empty() {
        output.push_str("\nThere haven't been any guesses yet!");
        return output;
    }

    output.push_str(&format!(
        " There have been **{}** guesses so far.",
        guesses.len()
    ));

    if let Some(winner) = status.winner() {
        output.push_str(&format!(
            "\n{} found the word on guess **{}**.",
            winner.user.name, winner.guess_number
        ));
    }

    let mut table = render_table(None, &guesses[..guesses.len().min(MAX_ROWS)]);
    if guesses.len() > MAX_ROWS {
        table.push_str("\n...");
    }
    output.push_str(&format!("\n```\n{}\n```", table));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Guess, SessionState, User};

    fn guess(number: u32, percentile: Option<u16>) -> Guess {
        Guess {
            user: User {
                id: "1".to_string(),
                name: "ann".to_string(),
            },
            guess_number: number,
            word: format!("w{}", number),
            similarity: 50.0 - number as f64,
            percentile,
        }
    }

    fn status(state: SessionState, guesses: Vec<Guess>) -> GameStatus {
        GameStatus { state, guesses }
    }

    #[test]
    fn test_no_guesses_yet() {
        assert_eq!(
            format_stat(90 * 60_000, &status(SessionState::NoGuesses, vec![])),
            "The current game started **1h30m** ago.\nThere haven't been any guesses yet!"
        );
    }

    #[test]
    fn test_lists_guesses() {
        let text = format_stat(
            0,
            &status(
                SessionState::InProgress,
                vec![guess(1, None), guess(2, Some(120))],
            ),
        );
        assert!(text.contains("There have been **2** guesses so far."));
        assert!(text.contains("w1"));
        assert!(text.contains(" 120/1000"));
        assert!(!text.contains("found the word"));
        assert!(!text.contains("..."));
    }

    #[test]
    fn test_caps_rows_and_reports_winner() {
        let mut guesses: Vec<Guess> = (1..=20).map(|n| guess(n, None)).collect();
        guesses[0].percentile = Some(1000);
        let text = format_stat(0, &status(SessionState::Found, guesses));
        assert!(text.contains("ann found the word on guess **1**."));
        assert!(text.contains("w15"));
        assert!(!text.contains("w16"));
        assert!(text.contains("\n...\n```"));
    }
}
