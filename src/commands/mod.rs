mod giveup;
mod guess;
mod stat;
mod yesterday;

use tracing::error;

use crate::game::User;
use crate::state::{AppState, Context};

/// Discord rejects messages over 2000 chars.
const MESSAGE_LIMIT: usize = 1990;

const FENCE: &str = "```";

pub fn all() -> Vec<poise::Command<AppState, anyhow::Error>> {
    vec![
        guess::guess(),
        stat::stat(),
        giveup::igiveup(),
        yesterday::yesterday(),
    ]
}

/// The invoking member: guild nickname when set, else username.
async fn player(ctx: &Context<'_>) -> User {
    let name = ctx
        .author_member()
        .await
        .and_then(|member| member.nick.clone())
        .unwrap_or_else(|| ctx.author().name.clone());
    User {
        id: ctx.author().id.get().to_string(),
        name,
    }
}

/// Send a message in Discord-safe chunks, splitting on newlines where possible.
async fn send_chunked(ctx: &Context<'_>, text: &str) -> Result<(), anyhow::Error> {
    for chunk in split_chunks(text, MESSAGE_LIMIT) {
        ctx.say(chunk).await?;
    }
    Ok(())
}

/// Split `text` into pieces of at most `limit` bytes. A split inside a code
/// block closes the fence in one chunk and reopens it in the next.
fn split_chunks(text: &str, limit: usize) -> Vec<String> {
    // Leave room for a closing "\n```" and a reopening "```\n"
    let budget = limit.saturating_sub(2 * (FENCE.len() + 1)).max(1);
    let mut chunks = Vec::new();
    let mut remaining = text;
    let mut in_fence = false;
    while !remaining.is_empty() {
        let mut chunk = String::new();
        if in_fence {
            // The block ends exactly at the split, and the last chunk already closed it
            if let Some(rest) = remaining.strip_prefix(FENCE) {
                remaining = rest.strip_prefix('\n').unwrap_or(rest);
                in_fence = false;
                continue;
            }
            chunk.push_str(FENCE);
            chunk.push('\n');
        }

        let mut end = remaining.len().min(budget);
        while !remaining.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            end = remaining.chars().next().map_or(remaining.len(), char::len_utf8);
        }
        let split_at = if end < remaining.len() {
            remaining[..end]
                .rfind('\n')
                .map(|i| i + 1)
                .unwrap_or(end)
        } else {
            end
        };

        let piece = &remaining[..split_at];
        if piece.matches(FENCE).count() % 2 == 1 {
            in_fence = !in_fence;
        }
        chunk.push_str(piece);
        remaining = &remaining[split_at..];

        if in_fence && !remaining.is_empty() {
            if !chunk.ends_with('\n') {
                chunk.push('\n');
            }
            chunk.push_str(FENCE);
        }
        chunks.push(chunk);
    }
    chunks
}

/// Every command failure ends up here as one user-visible reply.
pub async fn on_error(err: poise::FrameworkError<'_, AppState, anyhow::Error>) {
    match err {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(command = ctx.command().name, "Command failed: {:#}", error);
            if let Err(e) = ctx.say(format!("Something went wrong: {}", error)).await {
                error!("Failed to report command error: {}", e);
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_chunk() {
        assert_eq!(split_chunks("hello", 20), vec!["hello"]);
        assert!(split_chunks("", 20).is_empty());
    }

    #[test]
    fn test_splits_on_newline() {
        let chunks = split_chunks("aaaa\nbbbb\ncccc", 16);
        assert_eq!(chunks, vec!["aaaa\n", "bbbb\n", "cccc"]);
    }

    #[test]
    fn test_never_splits_inside_a_char() {
        let text = "🟩🟩🟩";
        let chunks = split_chunks(text, 13);
        assert_eq!(chunks.concat(), text);
        assert!(chunks.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn test_split_table_keeps_fences_balanced() {
        let rows: String = (0..30).map(|n| format!("row{:02}\n", n)).collect();
        let text = format!("head\n```\n{}```\ntail", rows);
        let chunks = split_chunks(&text, 40);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 40, "chunk too long: {:?}", chunk);
            assert_eq!(chunk.matches(FENCE).count() % 2, 0, "unbalanced: {:?}", chunk);
        }
        let joined = chunks.concat();
        for n in 0..30 {
            assert_eq!(joined.matches(&format!("row{:02}", n)).count(), 1);
        }
        assert!(chunks[0].starts_with("head\n```\n"));
        assert!(chunks.last().unwrap().ends_with("tail"));
    }

    #[test]
    fn test_fence_closing_at_split_is_not_reopened() {
        // The split lands right before the closing fence
        let chunks = split_chunks("```\naaaaaaaaa\n```\nbye", 23);
        assert_eq!(chunks, vec!["```\naaaaaaaaa\n```", "bye"]);
    }
}
