use std::io::{BufRead, Write};

use ytmp3_core::models::search::SearchItem;

#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Zero-based index into the listed items.
    Chosen(usize),
    /// The number the user typed, which names no listed item.
    OutOfRange(i64),
    Invalid(String),
    Cancelled,
}

pub fn print_results<W: Write>(items: &[SearchItem], out: &mut W) -> std::io::Result<()> {
    for (index, item) in items.iter().enumerate() {
        writeln!(out, "{}: {}", index + 1, item.title)?;
    }
    Ok(())
}

/// One trimmed line, or `None` at EOF.
fn read_trimmed_line<R: BufRead>(input: &mut R) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

pub fn parse_choice(text: &str, count: usize) -> Selection {
    match text.trim().parse::<i64>() {
        Ok(n) if n >= 1 && (n as u64) <= count as u64 => Selection::Chosen((n - 1) as usize),
        Ok(n) => Selection::OutOfRange(n),
        Err(_) => Selection::Invalid(text.trim().to_string()),
    }
}

pub fn prompt_selection<R: BufRead, W: Write>(
    items: &[SearchItem],
    input: &mut R,
    out: &mut W,
) -> std::io::Result<Selection> {
    tracing::info!("Displaying search results for selection");
    print_results(items, out)?;
    write!(out, "Enter the number of the video to download: ")?;
    out.flush()?;

    match read_trimmed_line(input)? {
        None => Ok(Selection::Cancelled),
        Some(text) => Ok(parse_choice(&text, items.len())),
    }
}

/// Resolves a selection against `items`, logging why nothing was picked.
pub fn resolve<'a>(items: &'a [SearchItem], selection: &Selection) -> Option<&'a SearchItem> {
    match selection {
        Selection::Chosen(i) => items.get(*i),
        Selection::OutOfRange(n) => {
            tracing::error!(
                "Invalid selection {}: choose a number between 1 and {}",
                n,
                items.len()
            );
            None
        }
        Selection::Invalid(text) => {
            tracing::error!("Invalid input '{}': please enter a valid number", text);
            None
        }
        Selection::Cancelled => {
            tracing::info!("Selection cancelled");
            None
        }
    }
}

pub fn confirm_download<R: BufRead, W: Write>(
    title: &str,
    input: &mut R,
    out: &mut W,
) -> std::io::Result<bool> {
    write!(out, "Confirm download of video '{}'? (y/n): ", title)?;
    out.flush()?;
    let answer = read_trimmed_line(input)?.unwrap_or_default().to_lowercase();
    Ok(answer == "y")
}
