//! Terminal setup, teardown and diffed drawing.

use std::io::{self, Stdout, Write};
use std::panic;

use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Attribute, Color, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::buffer::{Buffer, Style, char_width};

/// Owns the alternate screen. The terminal is restored on drop and on panic.
pub struct Terminal {
    stdout: Stdout,
    current: Buffer,
    previous: Buffer,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));

        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide, EnableMouseCapture)?;

        let (width, height) = terminal::size()?;
        Ok(Self {
            stdout,
            current: Buffer::new(width, height),
            previous: Buffer::new(width, height),
        })
    }

    /// A cleared buffer sized to the terminal, ready for the next frame.
    pub fn frame(&mut self) -> io::Result<&mut Buffer> {
        let (width, height) = terminal::size()?;
        if width != self.current.width() || height != self.current.height() {
            self.current = Buffer::new(width, height);
            self.previous = Buffer::new(width, height);
            execute!(self.stdout, Clear(ClearType::All))?;
        }
        self.current.clear();
        Ok(&mut self.current)
    }

    /// Writes the cells that changed since the last flush.
    pub fn flush(&mut self) -> io::Result<()> {
        let mut last_x = u16::MAX;
        let mut last_y = u16::MAX;
        let mut last_width: u16 = 1;
        let mut last_style = Style::default();

        queue!(self.stdout, SetAttribute(Attribute::Reset), ResetColor)?;

        for (x, y, cell) in self.current.diff(&self.previous) {
            if cell.wide_continuation {
                continue;
            }
            if y != last_y || x != last_x.wrapping_add(last_width) {
                queue!(self.stdout, cursor::MoveTo(x, y))?;
            }
            if cell.style != last_style {
                queue!(self.stdout, SetAttribute(Attribute::Reset))?;
                queue!(self.stdout, SetForegroundColor(cell.style.fg.unwrap_or(Color::Reset)))?;
                if cell.style.bold {
                    queue!(self.stdout, SetAttribute(Attribute::Bold))?;
                }
                if cell.style.dim {
                    queue!(self.stdout, SetAttribute(Attribute::Dim))?;
                }
                if cell.style.reverse {
                    queue!(self.stdout, SetAttribute(Attribute::Reverse))?;
                }
                last_style = cell.style;
            }
            write!(self.stdout, "{}", cell.ch)?;

            last_x = x;
            last_y = y;
            last_width = char_width(cell.ch).max(1) as u16;
        }

        queue!(self.stdout, SetAttribute(Attribute::Reset), ResetColor)?;
        self.stdout.flush()?;
        std::mem::swap(&mut self.current, &mut self.previous);
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

fn restore_terminal() -> io::Result<()> {
    terminal::disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, cursor::Show, DisableMouseCapture)?;
    Ok(())
}
