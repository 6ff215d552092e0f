//! Terminal host for the navigation widget.
//!
//! Each canvas cell shows two logical pixels with an upper-half-block glyph:
//! the foreground is the top pixel and the background the bottom one.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::graphics::PixelBuffer;
use crate::viewport::Viewport;
use crate::widget::{Interaction, NavigationWidget};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use log::{debug, info};
use std::io::{self, Write};
use std::time::Duration;

pub const TITLE: &str = "3D Navigation";
pub const HINT: &str = "Drag to rotate";

/// Smallest terminal that fits the toolbar and one canvas row
pub const MIN_COLS: u16 = 28;
pub const MIN_ROWS: u16 = 3;

/// Canvas background behind the translucent strokes
pub const BACKGROUND: [u8; 3] = [10, 14, 26];
const BAR_BACKGROUND: Color = Color::Rgb { r: 20, g: 26, b: 44 };
const ACCENT: Color = Color::Rgb {
    r: 0,
    g: 255,
    b: 255,
};
const MUTED: Color = Color::Rgb {
    r: 120,
    g: 130,
    b: 150,
};

/// Glyphs from empty to fully covered, for `--plain` snapshots
const SHADES: &[u8] = b" .:-=+*#%@";

/// Toolbar buttons, left to right
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    ZoomOut,
    ZoomIn,
    Reset,
}

impl Button {
    pub const ALL: [Button; 3] = [Button::ZoomOut, Button::ZoomIn, Button::Reset];
    const WIDTH: u16 = 3;

    pub fn label(self) -> &'static str {
        match self {
            Button::ZoomOut => "[-]",
            Button::ZoomIn => "[+]",
            Button::Reset => "[R]",
        }
    }

    pub fn interaction(self) -> Interaction {
        match self {
            Button::ZoomOut => Interaction::ZoomOut,
            Button::ZoomIn => Interaction::ZoomIn,
            Button::Reset => Interaction::Reset,
        }
    }
}

/// Screen split: toolbar on the first row, hint on the last, canvas between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub cols: u16,
    pub rows: u16,
}

impl Layout {
    pub fn new(cols: u16, rows: u16) -> Self {
        Layout { cols, rows }
    }

    pub fn fits(&self) -> bool {
        self.cols >= MIN_COLS && self.rows >= MIN_ROWS
    }

    pub fn canvas_top(&self) -> u16 {
        1
    }

    pub fn canvas_rows(&self) -> u16 {
        self.rows.saturating_sub(2)
    }

    pub fn hint_row(&self) -> u16 {
        self.rows.saturating_sub(1)
    }

    /// Canvas viewport: one logical unit per column, two per row
    pub fn viewport(&self, pixel_ratio: f64) -> Viewport {
        Viewport::new(
            f64::from(self.cols),
            f64::from(self.canvas_rows()) * 2.0,
            pixel_ratio,
        )
    }

    /// Logical canvas position of a cell, or `None` outside the canvas
    pub fn to_logical(&self, column: u16, row: u16) -> Option<(f64, f64)> {
        if column >= self.cols || row < self.canvas_top() || row >= self.hint_row() {
            return None;
        }
        Some((
            f64::from(column),
            f64::from(row - self.canvas_top()) * 2.0,
        ))
    }

    /// First column of each toolbar button, right-aligned with a one-cell margin
    pub fn button_columns(&self) -> [(Button, u16); 3] {
        let span = Button::WIDTH * 3 + 2;
        let start = self.cols.saturating_sub(span + 1);
        let mut columns = [(Button::ZoomOut, 0); 3];
        for (i, button) in Button::ALL.into_iter().enumerate() {
            columns[i] = (button, start + i as u16 * (Button::WIDTH + 1));
        }
        columns
    }

    pub fn button_at(&self, column: u16, row: u16) -> Option<Button> {
        if row != 0 {
            return None;
        }
        self.button_columns()
            .into_iter()
            .find(|&(_, start)| column >= start && column < start + Button::WIDTH)
            .map(|(button, _)| button)
    }
}

/// What a terminal event asks the host to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Widget(Interaction),
    ToggleDebug,
    Quit,
    Ignore,
}

pub fn key_action(key: &KeyEvent) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::Ignore;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('-') => Action::Widget(Interaction::ZoomOut),
        KeyCode::Char('+') | KeyCode::Char('=') => Action::Widget(Interaction::ZoomIn),
        KeyCode::Char('r') | KeyCode::Char('R') => Action::Widget(Interaction::Reset),
        KeyCode::Char('d') | KeyCode::Char('D') => Action::ToggleDebug,
        _ => Action::Ignore,
    }
}

pub fn mouse_action(layout: &Layout, mouse: &MouseEvent) -> Action {
    let canvas = layout.to_logical(mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(button) = layout.button_at(mouse.column, mouse.row) {
                Action::Widget(button.interaction())
            } else if let Some((x, y)) = canvas {
                Action::Widget(Interaction::PointerDown { x, y })
            } else {
                Action::Ignore
            }
        }
        MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => match canvas {
            Some((x, y)) => Action::Widget(Interaction::PointerMove { x, y }),
            None => Action::Widget(Interaction::PointerLeave),
        },
        MouseEventKind::Up(MouseButton::Left) => Action::Widget(Interaction::PointerUp),
        _ => Action::Ignore,
    }
}

pub fn event_action(layout: &Layout, pixel_ratio: f64, event: &Event) -> (Action, Option<Layout>) {
    match event {
        Event::Key(key) => (key_action(key), None),
        Event::Mouse(mouse) => (mouse_action(layout, mouse), None),
        Event::FocusLost => (Action::Widget(Interaction::PointerLeave), None),
        Event::Resize(cols, rows) => {
            let layout = Layout::new(*cols, *rows);
            (
                Action::Widget(Interaction::Resize(layout.viewport(pixel_ratio))),
                Some(layout),
            )
        }
        _ => (Action::Ignore, None),
    }
}

/// Two logical pixels stacked in one character cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub top: [u8; 3],
    pub bottom: [u8; 3],
    /// Mean stroke opacity over both halves, 0..=1
    pub coverage: f64,
}

/// Averages the device pixels behind one logical pixel and composites the
/// result over the background. Returns the color and the mean opacity.
fn logical_pixel(buffer: &PixelBuffer, lx: usize, ly: usize) -> ([u8; 3], f64) {
    let ratio = buffer.pixel_ratio();
    let span = |l: usize, limit: usize| {
        let start = (l as f64 * ratio).floor() as usize;
        let end = (((l + 1) as f64 * ratio).floor() as usize)
            .max(start + 1)
            .min(limit);
        (start, end)
    };
    let (x0, x1) = span(lx, buffer.width());
    let (y0, y1) = span(ly, buffer.height());
    if x0 >= x1 || y0 >= y1 {
        return (BACKGROUND, 0.0);
    }

    let mut premultiplied = [0.0f64; 3];
    let mut alpha = 0.0;
    for y in y0..y1 {
        for x in x0..x1 {
            let [r, g, b, a] = buffer.pixel(x, y).unwrap_or([0; 4]);
            let a = f64::from(a) / 255.0;
            premultiplied[0] += f64::from(r) * a;
            premultiplied[1] += f64::from(g) * a;
            premultiplied[2] += f64::from(b) * a;
            alpha += a;
        }
    }
    let samples = ((x1 - x0) * (y1 - y0)) as f64;
    let alpha = alpha / samples;
    let mut color = [0u8; 3];
    for (i, channel) in color.iter_mut().enumerate() {
        let value = premultiplied[i] / samples + f64::from(BACKGROUND[i]) * (1.0 - alpha);
        *channel = value.round().clamp(0.0, 255.0) as u8;
    }
    (color, alpha)
}

/// Downsamples the widget surface into `rows` rows of `cols` cells
pub fn canvas_cells(buffer: Option<&PixelBuffer>, cols: usize, rows: usize) -> Vec<Vec<Cell>> {
    (0..rows)
        .map(|row| {
            (0..cols)
                .map(|col| match buffer {
                    Some(buffer) => {
                        let (top, top_alpha) = logical_pixel(buffer, col, row * 2);
                        let (bottom, bottom_alpha) = logical_pixel(buffer, col, row * 2 + 1);
                        Cell {
                            top,
                            bottom,
                            coverage: (top_alpha + bottom_alpha) / 2.0,
                        }
                    }
                    None => Cell {
                        top: BACKGROUND,
                        bottom: BACKGROUND,
                        coverage: 0.0,
                    },
                })
                .collect()
        })
        .collect()
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb { r, g, b }
}

/// Writes one row of cells as colored half blocks, starting at the cursor
fn write_row<W: Write>(out: &mut W, cells: &[Cell]) -> io::Result<()> {
    let mut current: Option<([u8; 3], [u8; 3])> = None;
    for cell in cells {
        if current != Some((cell.top, cell.bottom)) {
            queue!(
                out,
                SetForegroundColor(rgb(cell.top)),
                SetBackgroundColor(rgb(cell.bottom))
            )?;
            current = Some((cell.top, cell.bottom));
        }
        queue!(out, Print('▀'))?;
    }
    queue!(out, ResetColor)
}

/// Cells as ANSI-colored text, one line per row
pub fn render_ansi(cells: &[Vec<Cell>]) -> io::Result<String> {
    let mut out = Vec::new();
    for row in cells {
        write_row(&mut out, row)?;
        out.push(b'\n');
    }
    String::from_utf8(out).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Cells as ASCII shading by stroke coverage, one line per row
pub fn render_plain(cells: &[Vec<Cell>]) -> String {
    let mut text = String::with_capacity(cells.iter().map(|row| row.len() + 1).sum());
    for row in cells {
        for cell in row {
            let index = (cell.coverage * (SHADES.len() - 1) as f64).round() as usize;
            text.push(char::from(SHADES[index.min(SHADES.len() - 1)]));
        }
        text.push('\n');
    }
    text
}

/// Truncates `text` to at most `width` characters
fn fit(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

fn present<W: Write>(out: &mut W, widget: &NavigationWidget, layout: &Layout) -> io::Result<()> {
    let cols = usize::from(layout.cols);

    // Toolbar
    queue!(
        out,
        MoveTo(0, 0),
        SetBackgroundColor(BAR_BACKGROUND),
        Print(" ".repeat(cols)),
        MoveTo(1, 0),
        SetForegroundColor(ACCENT),
        SetAttribute(Attribute::Bold),
        Print(fit(TITLE, cols.saturating_sub(1))),
        SetAttribute(Attribute::Reset),
        SetBackgroundColor(BAR_BACKGROUND),
    )?;
    for (button, column) in layout.button_columns() {
        queue!(
            out,
            MoveTo(column, 0),
            SetForegroundColor(ACCENT),
            Print(button.label())
        )?;
    }
    queue!(out, ResetColor)?;

    // Canvas
    let cells = canvas_cells(widget.surface(), cols, usize::from(layout.canvas_rows()));
    for (i, row) in cells.iter().enumerate() {
        queue!(out, MoveTo(0, layout.canvas_top() + i as u16))?;
        write_row(out, row)?;
    }

    // Hint or debug status
    let line = if widget.debug() {
        fit(&widget.status_line(), cols)
    } else {
        let hint = fit(HINT, cols);
        format!("{:^width$}", hint, width = cols)
    };
    queue!(
        out,
        MoveTo(0, layout.hint_row()),
        Clear(ClearType::CurrentLine),
        SetForegroundColor(MUTED),
        Print(line),
        ResetColor
    )?;

    out.flush()
}

/// Terminal size from the OS, falling back to what the terminal reports
pub fn terminal_size() -> Result<(u16, u16)> {
    termsize::get()
        .map(|size| (size.cols, size.rows))
        .or_else(|| crossterm::terminal::size().ok())
        .filter(|&(cols, rows)| cols > 0 && rows > 0)
        .ok_or(Error::TerminalSize)
}

/// Renders a single frame to text without entering raw mode.
pub fn snapshot(config: &Config) -> Result<String> {
    let (cols, rows) = match (config.width, config.height) {
        (Some(cols), Some(rows)) => (cols, rows),
        (cols, rows) => {
            let (term_cols, term_rows) = terminal_size()?;
            (cols.unwrap_or(term_cols), rows.unwrap_or(term_rows))
        }
    };

    let viewport = Viewport::new(f64::from(cols), f64::from(rows) * 2.0, config.pixel_ratio);
    let mut widget = NavigationWidget::with_state(config.initial_state());
    widget.mount(viewport);
    debug!("snapshot {cols}x{rows}: {}", widget.status_line());

    let cells = canvas_cells(widget.surface(), usize::from(cols), usize::from(rows));
    if config.plain {
        Ok(render_plain(&cells))
    } else {
        Ok(render_ansi(&cells)?)
    }
}

/// Runs the interactive viewer until the user quits.
pub fn run(config: &Config) -> Result<()> {
    let (cols, rows) = terminal_size()?;
    let layout = Layout::new(cols, rows);
    if !layout.fits() {
        return Err(Error::TerminalTooSmall {
            cols,
            rows,
            min_cols: MIN_COLS,
            min_rows: MIN_ROWS,
        });
    }

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    let result = execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange,
        Hide,
        Clear(ClearType::All)
    )
    .map_err(Error::from)
    .and_then(|()| event_loop(&mut stdout, config, layout));

    let restored = restore(&mut stdout);
    result.and(restored)
}

fn restore<W: Write>(out: &mut W) -> Result<()> {
    execute!(
        out,
        Show,
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    disable_raw_mode()?;
    Ok(())
}

fn event_loop<W: Write>(out: &mut W, config: &Config, mut layout: Layout) -> Result<()> {
    info!("starting viewer at {}x{}", layout.cols, layout.rows);
    let mut widget = NavigationWidget::with_state(config.initial_state());
    if config.debug {
        widget.toggle_debug();
    }
    widget.mount(layout.viewport(config.pixel_ratio));
    present(out, &widget, &layout)?;

    loop {
        let mut quit = false;
        let mut pending = Some(event::read()?);
        while let Some(event) = pending.take() {
            let (action, resized) = event_action(&layout, config.pixel_ratio, &event);
            if let Some(resized) = resized {
                debug!("terminal resized to {}x{}", resized.cols, resized.rows);
                layout = resized;
                execute!(out, ResetColor, Clear(ClearType::All))?;
            }
            match action {
                Action::Widget(interaction) => widget.handle(interaction),
                Action::ToggleDebug => widget.toggle_debug(),
                Action::Quit => quit = true,
                Action::Ignore => {}
            }
            if quit {
                break;
            }
            // Drain whatever is already queued before presenting
            if event::poll(Duration::ZERO)? {
                pending = Some(event::read()?);
            }
        }

        if quit {
            info!("viewer closed after {} redraws", widget.redraw_count());
            return Ok(());
        }
        present(out, &widget, &layout)?;
    }
}
