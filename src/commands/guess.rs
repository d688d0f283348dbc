use tracing::info;

use super::{player, send_chunked};
use crate::game::{GameResult, Guess};
use crate::render::{render_duration, render_table};
use crate::state::Context;

/// How many other guesses to show under the new one.
const TOP_OTHERS: usize = 5;

/// Make a semantle guess
#[poise::command(slash_command, guild_only)]
pub async fn guess(
    ctx: Context<'_>,
    #[description = "The word to guess"] word: String,
) -> Result<(), anyhow::Error> {
    let user = player(&ctx).await;
    let channel_id = ctx.channel_id().get().to_string();

    info!(user = user.name, channel_id, word, "Guess received");

    let session = ctx.data().games.today_for_channel(&channel_id)?;
    let result = session.guess(&user, &word).await?;

    let reply = format_guess(&result, &word, session.time_until_next_ms());
    send_chunked(&ctx, &reply).await
}

pub(super) fn format_guess(result: &GameResult, word: &str, time_until_next_ms: i64) -> String {
    let guess = match (result, result.guess()) {
        (GameResult::Duplicate { .. }, Some(existing)) => {
            return format!("{} already guessed **{}**!", existing.user.name, word.trim())
        }
        (_, Some(guess)) => guess,
        (_, None) => return format!("I don't know the word **{}**.", word),
    };
    let guesses = result.guesses();
    let found = matches!(result, GameResult::Found { .. });

    let mut output = if found {
        format!(
            "{} wins! The secret word is **{}**.",
            guess.user.name, guess.word
        )
    } else {
        format!("{} guesses **{}**!", guess.user.name, guess.word)
    };

    let others: Vec<Guess> = guesses
        .iter()
        .filter(|g| g.guess_number != guess.guess_number)
        .take(TOP_OTHERS)
        .cloned()
        .collect();
    let mut table = render_table(Some(guess), &others);
    if guesses.len() > TOP_OTHERS + 1 {
        table.push_str("\n...");
    }
    output.push_str(&format!("\n```\n{}\n```", table));

    if found {
        output.push_str(&format!(
            "\nYou found it in **{}** guesses.\nNext game will be ready in {}.",
            guess.guess_number,
            render_duration(time_until_next_ms)
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::User;

    fn guess(number: u32, word: &str, similarity: f64, percentile: Option<u16>) -> Guess {
        Guess {
            user: User {
                id: number.to_string(),
                name: format!("p{}", number),
            },
            guess_number: number,
            word: word.to_string(),
            similarity,
            percentile,
        }
    }

    #[test]
    fn test_unknown_and_duplicate_messages() {
        assert_eq!(
            format_guess(&GameResult::Unknown, "xyzzy", 0),
            "I don't know the word **xyzzy**."
        );
        let apple = guess(1, "apple", 42.5, None);
        let dup = GameResult::Duplicate {
            guess: apple.clone(),
            guesses: vec![apple],
        };
        assert_eq!(format_guess(&dup, "apple", 0), "p1 already guessed **apple**!");
    }

    #[test]
    fn test_duplicate_echoes_typed_word() {
        let stored = guess(1, "ice_cream", 12.0, None);
        let dup = GameResult::Duplicate {
            guess: stored.clone(),
            guesses: vec![stored],
        };
        assert_eq!(
            format_guess(&dup, " ice cream ", 0),
            "p1 already guessed **ice cream**!"
        );
    }

    #[test]
    fn test_win_message() {
        let win = guess(3, "cat", 100.0, Some(1000));
        let result = GameResult::Found {
            guess: win.clone(),
            guesses: vec![win, guess(1, "apple", 42.5, None)],
        };
        let text = format_guess(&result, "cat", 2 * 3_600_000 + 5 * 60_000);
        assert!(text.starts_with("p3 wins! The secret word is **cat**."));
        assert!(text.contains("FOUND!"));
        assert!(text.contains("You found it in **3** guesses."));
        assert!(text.ends_with("Next game will be ready in 2h5m."));
    }

    #[test]
    fn test_table_is_capped() {
        let guesses: Vec<Guess> = (1..=8)
            .map(|n| guess(n, &format!("w{}", n), 100.0 - n as f64, None))
            .collect();
        let result = GameResult::Cold {
            guess: guesses[7].clone(),
            guesses: guesses.clone(),
        };
        let text = format_guess(&result, "w8", 0);
        assert!(text.starts_with("p8 guesses **w8**!"));
        assert!(text.contains("w5"));
        assert!(!text.contains("w6 "));
        assert!(text.contains("\n...\n```"));
    }
}
