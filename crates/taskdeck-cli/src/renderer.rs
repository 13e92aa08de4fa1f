//! Markdown output for the terminal.
//!
//! Everything the store renders is markdown. With color enabled, header
//! lines are tinted, status lines (`✓`/`✗`) are colored by outcome, and the
//! rest goes through termimad's inline styling. `--no-color` prints the
//! markdown untouched.

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

const CYAN: &str = "\x1b[36m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_fg(Color::Green);

        Self { rich_enabled, skin }
    }

    pub fn render(&self, markdown: &str) -> Result<()> {
        if !self.rich_enabled {
            print!("{markdown}");
            return Ok(());
        }

        for line in markdown.lines() {
            match line_color(line) {
                Some(color) => println!("{color}{line}{RESET}"),
                None => {
                    self.skin.print_inline(line);
                    println!();
                }
            }
        }
        Ok(())
    }

    /// Prints text without styling, for output other programs consume.
    pub fn render_raw(&self, text: &str) -> Result<()> {
        println!("{text}");
        Ok(())
    }

    /// Prints a warning to stderr so stdout stays clean.
    pub fn warn(&self, message: &str) {
        if self.rich_enabled {
            eprintln!("{YELLOW}⚠ {message}{RESET}");
        } else {
            eprintln!("⚠ {message}");
        }
    }
}

/// Headers keep their hash marks so nesting stays visible.
fn line_color(line: &str) -> Option<&'static str> {
    if line.starts_with('#') {
        Some(CYAN)
    } else if line.starts_with('✓') {
        Some(GREEN)
    } else if line.starts_with('✗') {
        Some(RED)
    } else {
        None
    }
}
