use console::{strip_ansi_codes, Term};
use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthStr;

use crate::notify::{Notice, NoticeLevel, Notifier};

/// Terminal output helpers
pub struct UI {
    term: Term,
}

impl UI {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    /// Helper method to conditionally apply color based on terminal support
    fn colorize<F>(&self, text: &str, color_fn: F) -> String
    where
        F: FnOnce(&str) -> String,
    {
        if self.supports_color() {
            color_fn(text)
        } else {
            text.to_string()
        }
    }

    pub fn success(&self, message: &str) {
        let output = self.colorize(message, |m| m.green().bold().to_string());
        println!("{}", output);
    }

    pub fn error(&self, message: &str) {
        let output = self.colorize(message, |m| m.red().bold().to_string());
        eprintln!("{}", output);
    }

    pub fn warning(&self, message: &str) {
        let output = self.colorize(message, |m| m.yellow().bold().to_string());
        println!("{}", output);
    }

    pub fn info(&self, message: &str) {
        let output = self.colorize(message, |m| m.blue().bold().to_string());
        println!("{}", output);
    }

    /// Authentication state with a matching color
    pub fn format_auth_status(&self, authenticated: bool, near_expiration: bool) -> String {
        let text = match (authenticated, near_expiration) {
            (true, false) => "Autenticado",
            (true, true) => "Autenticado (expira em breve)",
            (false, _) => "Não autenticado",
        };

        self.colorize(text, |t| match (authenticated, near_expiration) {
            (true, false) => t.green().to_string(),
            (true, true) => t.yellow().to_string(),
            (false, _) => t.red().to_string(),
        })
    }

    /// Event status colored the way the web front-end shows it
    pub fn format_event_status(&self, status: &str) -> String {
        self.colorize(status, |s| match s {
            "ABERTO" => s.green().to_string(),
            "RASCUNHO" => s.yellow().to_string(),
            "FECHADO" => s.red().to_string(),
            _ => s.dimmed().to_string(),
        })
    }

    /// Format user field with fallback for missing data
    pub fn format_user_field(&self, value: Option<String>) -> String {
        value
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "-".to_string())
    }

    pub fn header(&self, title: &str) {
        let term_width = self.width();
        let title_len = title.width() + 4;
        let line_len = if term_width > title_len {
            (term_width - title_len) / 2
        } else {
            0
        };

        let line = "═".repeat(line_len.min(30));

        println!();
        if self.supports_color() {
            println!("{} {} {}", line.cyan(), title.cyan().bold(), line.cyan());
        } else {
            println!("{} {} {}", line, title, line);
        }
        println!();
    }

    pub fn status(&self, label: &str, status: &str, is_good: bool) {
        if self.supports_color() {
            if is_good {
                println!("{}: {}", label.bold(), status.green());
            } else {
                println!("{}: {}", label.bold(), status.red());
            }
        } else {
            println!("{}: {}", label, status);
        }
    }

    /// Card-style block of label/value rows
    pub fn card(&self, title: &str, content: Vec<(&str, String)>) {
        let card_width = self.width().saturating_sub(4).clamp(50, 80);
        let supports_color = self.supports_color();

        println!("╭{}╮", "─".repeat(card_width - 2));
        let title_spaces = card_width.saturating_sub(title.width() + 4);
        if supports_color {
            println!("│ {} {}│", title.cyan().bold(), " ".repeat(title_spaces));
        } else {
            println!("│ {} {}│", title, " ".repeat(title_spaces));
        }
        println!("├{}┤", "─".repeat(card_width - 2));

        for (label, value) in content {
            // Widths are measured without ANSI codes
            let label_width = strip_ansi_codes(label).width();
            let value_width = strip_ansi_codes(&value).width();
            let content_width = label_width + value_width + 4;
            let spaces = if content_width < card_width - 1 {
                card_width - content_width - 1
            } else {
                1
            };

            if supports_color {
                println!("│ {}: {}{}│", label.dimmed(), value, " ".repeat(spaces));
            } else {
                println!("│ {}: {}{}│", label, value, " ".repeat(spaces));
            }
        }

        println!("╰{}╯", "─".repeat(card_width - 2));
        println!();
    }

    /// Terminal width for responsive layout
    pub fn width(&self) -> usize {
        self.term.size().1 as usize
    }

    pub fn supports_color(&self) -> bool {
        self.term.features().colors_supported()
    }
}

impl Default for UI {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints notices on the terminal as they arrive
#[derive(Default)]
pub struct ConsoleNotifier {
    ui: UI,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => self.ui.info(&notice.message),
            NoticeLevel::Warning => self.ui.warning(&notice.message),
            NoticeLevel::Error => self.ui.error(&notice.message),
        }
    }
}
