//! Line-oriented terminal front-end: a [`Renderer`] that prints to a writer,
//! and the command language the interactive prompt accepts.

use crate::paginate::PaginationMeta;
use crate::present::{CardProjection, DetailProjection};
use crate::render::Renderer;
use anyhow::{anyhow, bail};
use std::io::Write;
use tracing::warn;

/// Prints sessions as plain text
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        let result = self
            .out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush());
        if let Err(e) = result {
            warn!(error = %e, "Failed to write to terminal");
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render_list(&mut self, cards: &[CardProjection], meta: &PaginationMeta) {
        let mut text = String::new();
        for card in cards {
            text.push_str(&format!(
                "[{:>6}] {}  ⭐ {}  ({})\n",
                card.id, card.title, card.rating_display, card.status_display
            ));
        }

        let prev = if meta.is_first_page { "" } else { "prev  " };
        let next = if meta.is_last_page { "" } else { "next" };
        text.push_str(&format!(
            "-- {} ({} results) {}{}\n",
            meta.label(),
            meta.total_items,
            prev,
            next
        ));
        self.emit(&text);
    }

    fn render_empty(&mut self, message: &str) {
        self.emit(&format!("{}\n", message));
    }

    fn render_detail(&mut self, detail: &DetailProjection) {
        let text = format!(
            "\n{title}\n{rule}\n\
             Rating:     {rating}\n\
             Status:     {status}\n\
             Episodes:   {episodes}\n\
             Ep. Length: {length}\n\
             Age Rating: {age}\n\
             Start Date: {start}\n\
             End Date:   {end}\n\
             Genres:     {genres}\n\
             Poster:     {poster}\n\n\
             {synopsis}\n\n",
            title = detail.title,
            rule = "=".repeat(detail.title.chars().count()),
            rating = detail.rating_display,
            status = detail.status_display,
            episodes = detail.episode_count,
            length = detail.episode_length,
            age = detail.age_rating,
            start = detail.start_date_display,
            end = detail.end_date_display,
            genres = detail.genres_display,
            poster = detail.poster_url,
            synopsis = detail.synopsis,
        );
        self.emit(&text);
    }

    fn render_loading(&mut self, loading: bool) {
        if loading {
            self.emit("Loading...\n");
        }
    }
}

/// One line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Status(String),
    Rating(String),
    Next,
    Prev,
    Show(String),
    Help,
    Quit,
}

pub const HELP_TEXT: &str = "\
Commands:
  search [term]       search the catalog (blank lists the first page)
  status <value|any>  filter by status: current, finished, tba, unreleased, upcoming
  rating <value|any>  filter by age rating: G, PG, R, R18
  next | prev         change page
  show <id>           show details for a listed record
  help                show this help
  quit                exit
";

impl std::str::FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word {
            "search" | "s" => Command::Search(rest.to_string()),
            "status" => Command::Status(required(word, rest)?),
            "rating" => Command::Rating(required(word, rest)?),
            "next" | "n" => Command::Next,
            "prev" | "p" => Command::Prev,
            "show" => Command::Show(required(word, rest)?),
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            "" => bail!("Empty command"),
            other => return Err(anyhow!("Unknown command: {} (try `help`)", other)),
        };
        Ok(command)
    }
}

fn required(word: &str, rest: &str) -> anyhow::Result<String> {
    if rest.is_empty() {
        bail!("`{}` needs a value", word);
    }
    Ok(rest.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, title: &str) -> CardProjection {
        CardProjection {
            id: id.to_string(),
            title: title.to_string(),
            poster_url: "https://img/medium.jpg".to_string(),
            rating_display: "82".to_string(),
            status_display: "finished".to_string(),
        }
    }

    #[test]
    fn test_render_list_shows_cards_and_page_label() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        let meta = PaginationMeta {
            current_page: 1,
            total_pages: 3,
            total_items: 25,
            is_first_page: true,
            is_last_page: false,
        };
        renderer.render_list(&[card("1", "Cowboy Bebop")], &meta);

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(out.contains("Cowboy Bebop"));
        assert!(out.contains("Page 1 of 3"));
        assert!(out.contains("next"));
        assert!(!out.contains("prev"));
    }

    #[test]
    fn test_render_empty_and_loading() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.render_loading(true);
        renderer.render_loading(false);
        renderer.render_empty("No anime found. Try a different search or filter.");

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(out, "Loading...\nNo anime found. Try a different search or filter.\n");
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("search  naruto shippuden ".parse::<Command>().unwrap(), Command::Search("naruto shippuden".to_string()));
        assert_eq!("search".parse::<Command>().unwrap(), Command::Search(String::new()));
        assert_eq!("status finished".parse::<Command>().unwrap(), Command::Status("finished".to_string()));
        assert_eq!("rating any".parse::<Command>().unwrap(), Command::Rating("any".to_string()));
        assert_eq!("n".parse::<Command>().unwrap(), Command::Next);
        assert_eq!("prev".parse::<Command>().unwrap(), Command::Prev);
        assert_eq!("show 42".parse::<Command>().unwrap(), Command::Show("42".to_string()));
        assert_eq!("quit".parse::<Command>().unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("".parse::<Command>().is_err());
        assert!("show".parse::<Command>().is_err());
        assert!("dance".parse::<Command>().is_err());
    }
}
