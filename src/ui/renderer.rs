// src/ui/renderer.rs
use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Attribute, Color, ContentStyle, Print, PrintStyledContent},
    terminal::{self, Clear, ClearType},
};

use crate::editor::MemoryHost;

pub struct Renderer {
    dimensions: (u16, u16),
    // First buffer row on screen
    top: usize,
}

impl Renderer {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dimensions: terminal::size()?,
            top: 0,
        })
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.dimensions = (width, height);
    }

    /// Rows left for buffer text after the status and command lines
    pub fn text_rows(&self) -> usize {
        usize::from(self.dimensions.1.saturating_sub(2)).max(1)
    }

    fn scroll_to(&mut self, row: usize) {
        let rows = self.text_rows();
        if row < self.top {
            self.top = row;
        } else if row >= self.top + rows {
            self.top = row + 1 - rows;
        }
    }

    pub fn render<W: Write>(&mut self, writer: &mut W, host: &MemoryHost) -> io::Result<()> {
        let (row, col) = host.cursor_position();
        self.scroll_to(row);

        queue!(writer, Hide, Clear(ClearType::All))?;
        for screen_row in 0..self.text_rows() {
            self.render_line(writer, host, screen_row)?;
        }
        self.render_status_line(writer, host)?;
        self.render_command_line(writer, host)?;

        match host.prompt() {
            Some(prompt) => {
                let col = prompt.chars().count() + host.command_text().chars().count();
                queue!(writer, MoveTo(clamp_u16(col), self.dimensions.1.saturating_sub(1)))?;
            }
            None => queue!(writer, MoveTo(clamp_u16(col), clamp_u16(row - self.top)))?,
        }
        queue!(writer, Show)?;
        writer.flush()
    }

    fn render_line<W: Write>(&self, writer: &mut W, host: &MemoryHost, screen_row: usize) -> io::Result<()> {
        let text = match host.lines().get(self.top + screen_row) {
            // Tabs take one cell so screen columns match buffer columns
            Some(line) => line
                .chars()
                .map(|c| if c == '\t' { ' ' } else { c })
                .take(usize::from(self.dimensions.0))
                .collect(),
            None => "~".to_string(),
        };
        queue!(writer, MoveTo(0, clamp_u16(screen_row)), Print(text))
    }

    fn render_status_line<W: Write>(&self, writer: &mut W, host: &MemoryHost) -> io::Result<()> {
        let indicator = host.indicator();
        let (row, col) = host.cursor_position();
        let name = host
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "[No Name]".to_string());

        queue!(
            writer,
            MoveTo(0, self.dimensions.1.saturating_sub(2)),
            PrintStyledContent(parse_attrs(&indicator.attrs).apply(format!(" {} ", indicator.name))),
            Print(format!(" {}  {}:{}", name, row + 1, col + 1))
        )
    }

    fn render_command_line<W: Write>(&self, writer: &mut W, host: &MemoryHost) -> io::Result<()> {
        let text = match host.prompt() {
            Some(prompt) => format!("{}{}", prompt, host.command_text()),
            None => host.messages().last().cloned().unwrap_or_default(),
        };
        queue!(writer, MoveTo(0, self.dimensions.1.saturating_sub(1)), Print(text))
    }
}

fn clamp_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Turn an attribute string such as `"bg !4 bold"` into a style. `!N` is a
/// palette color and `#rrggbb` a true color; unknown words are skipped.
pub fn parse_attrs(attrs: &str) -> ContentStyle {
    let mut style = ContentStyle::new();
    let mut words = attrs.split_whitespace();
    while let Some(word) = words.next() {
        match word {
            "fg" | "bg" => {
                let Some(color) = words.next().and_then(parse_color) else {
                    continue;
                };
                if word == "fg" {
                    style.foreground_color = Some(color);
                } else {
                    style.background_color = Some(color);
                }
            }
            "bold" => style.attributes.set(Attribute::Bold),
            "inverse" => style.attributes.set(Attribute::Reverse),
            "underline" => style.attributes.set(Attribute::Underlined),
            _ => {}
        }
    }
    style
}

fn parse_color(s: &str) -> Option<Color> {
    if let Some(index) = s.strip_prefix('!') {
        return index.parse().ok().map(Color::AnsiValue);
    }
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| hex.get(i..i + 2).and_then(|h| u8::from_str_radix(h, 16).ok());
    Some(Color::Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_palette_attrs() {
        let style = parse_attrs("bg !4");
        assert_eq!(style.background_color, Some(Color::AnsiValue(4)));
        assert_eq!(style.foreground_color, None);
    }

    #[test]
    fn test_parse_mixed_attrs() {
        let style = parse_attrs("fg #ff8000 bold inverse");
        assert_eq!(style.foreground_color, Some(Color::Rgb { r: 255, g: 128, b: 0 }));
        assert!(style.attributes.has(Attribute::Bold));
        assert!(style.attributes.has(Attribute::Reverse));
    }

    #[test]
    fn test_bad_colors_are_skipped() {
        let style = parse_attrs("fg !999 bg #12 sparkly");
        assert_eq!(style, ContentStyle::new());
    }

    #[test]
    fn test_render_writes_status_and_text() {
        let mut renderer = Renderer {
            dimensions: (40, 5),
            top: 0,
        };
        let host = MemoryHost::from_text("hello\nworld");
        let mut out = Vec::new();
        renderer.render(&mut out, &host).unwrap();
        let out = String::from_utf8_lossy(&out);
        assert!(out.contains("hello"));
        assert!(out.contains("[No Name]"));
        assert!(out.contains('~'));
    }

    #[test]
    fn test_scrolls_to_cursor() {
        let mut renderer = Renderer {
            dimensions: (40, 5),
            top: 0,
        };
        renderer.scroll_to(7);
        assert_eq!(renderer.top, 5);
        renderer.scroll_to(2);
        assert_eq!(renderer.top, 2);
    }
}
