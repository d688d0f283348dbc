//! Text rendering for Discord replies.

use crate::game::{Guess, FOUND_PERCENTILE};

const HEADINGS: [&str; 5] = ["From", "#", "Guess", "Similarity", "Getting close?"];
const BAR_BLOCKS: usize = 10;

/// `FOUND!`, a 10-block bar for warm guesses, or `(cold)`.
pub fn render_percentile(percentile: Option<u16>) -> String {
    match percentile {
        Some(FOUND_PERCENTILE) => "FOUND!".to_string(),
        Some(p) => {
            let blocks = ((p as f64 / FOUND_PERCENTILE as f64) * BAR_BLOCKS as f64).round() as usize;
            let blocks = blocks.min(BAR_BLOCKS);
            format!(
                "{:>4}/1000 {}{}",
                p,
                "🟩".repeat(blocks),
                "⬛".repeat(BAR_BLOCKS - blocks)
            )
        }
        None => "(cold)".to_string(),
    }
}

/// `"{hours}h{minutes}m"`, both floored.
pub fn render_duration(ms: i64) -> String {
    let ms = ms.max(0);
    format!("{}h{}m", ms / 3_600_000, (ms % 3_600_000) / 60_000)
}

fn row(guess: &Guess) -> [String; 5] {
    [
        guess.user.name.clone(),
        guess.guess_number.to_string(),
        guess.word.clone(),
        format!("{:.2}", guess.similarity),
        render_percentile(guess.percentile),
    ]
}

/// Borderless left-aligned table. A `pinned` guess goes first, ruled off
/// from the rest.
pub fn render_table(pinned: Option<&Guess>, guesses: &[Guess]) -> String {
    let header = HEADINGS.map(str::to_string);
    let pinned = pinned.map(row);
    let rows: Vec<[String; 5]> = guesses.iter().map(row).collect();

    let mut widths = [0usize; 5];
    for cells in std::iter::once(&header).chain(pinned.iter()).chain(rows.iter()) {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String; 5]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        padded.join("  ").trim_end().to_string()
    };
    let rule = "―".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1));

    let mut lines = vec![line(&header), rule.clone()];
    if let Some(cells) = &pinned {
        lines.push(line(cells));
        if !rows.is_empty() {
            lines.push(rule);
        }
    }
    lines.extend(rows.iter().map(|cells| line(cells)));
    lines.join("\n")
}
