use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
    Frame,
};

use crate::app::{App, LoadState, Popup};
use crate::braille::BrailleCanvas;
use crate::filter::Dimension;
use crate::map::MapLayers;
use crate::overlay::{FilterControls, Overlay};
use crate::style::ColorResolution;

/// Filter panel placement, in absolute terminal cells
const CONTROLS_X: u16 = 2;
const CONTROLS_Y: u16 = 1;
const CONTROLS_WIDTH: u16 = 34;
const CONTROLS_HEIGHT: u16 = FilterControls::ROWS.len() as u16 + 2;

const LEGEND_WIDTH: u16 = 16;

/// Filter control under a terminal cell, if any
pub fn control_row_at(col: u16, row: u16) -> Option<Dimension> {
    let inside = col > CONTROLS_X && col < CONTROLS_X + CONTROLS_WIDTH - 1;
    FilterControls::ROWS
        .iter()
        .enumerate()
        .find(|(i, _)| inside && row == CONTROLS_Y + 1 + *i as u16)
        .map(|(_, dimension)| *dimension)
}

/// First cell of a control's row
pub fn control_row_origin(dimension: Dimension) -> (u16, u16) {
    let i = FilterControls::ROWS
        .iter()
        .position(|d| *d == dimension)
        .unwrap_or(0);
    (CONTROLS_X + 1, CONTROLS_Y + 1 + i as u16)
}

/// Map area and status bar
fn split(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

fn controls_rect(bounds: Rect) -> Rect {
    panel_rect(CONTROLS_X, CONTROLS_Y, CONTROLS_WIDTH, CONTROLS_HEIGHT, bounds)
}

fn legend_rect(rows: usize, bounds: Rect) -> Rect {
    panel_rect(
        CONTROLS_X,
        CONTROLS_Y + CONTROLS_HEIGHT,
        LEGEND_WIDTH,
        rows as u16 + 2,
        bounds,
    )
}

fn popup_rect(bounds: Rect) -> Rect {
    let width = bounds.width.saturating_sub(4).min(72);
    let height = 8.min(bounds.height);
    Rect::new(
        bounds.x + (bounds.width.saturating_sub(width)) / 2,
        bounds.y + bounds.height.saturating_sub(height + 1),
        width,
        height,
    )
}

/// Whether the cell is covered by a panel drawn over the map. Clicks there
/// belong to the panel and never reach the markers beneath.
pub fn panel_at(app: &App, area: Rect, col: u16, row: u16) -> bool {
    let (bounds, _) = split(area);
    let pos = Position::new(col, row);

    (app.controls.is_mounted() && controls_rect(bounds).contains(pos))
        || (app.legend.is_mounted() && legend_rect(app.legend.entries().len(), bounds).contains(pos))
        || (app.popup.is_some() && popup_rect(bounds).contains(pos))
}

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let (map_area, status_area) = split(frame.area());

    render_map(frame, app, map_area);

    if app.controls.is_mounted() {
        render_controls(frame, &app.controls, map_area);
    }
    if app.legend.is_mounted() {
        render_legend(frame, app, map_area);
    }
    if let Some(popup) = &app.popup {
        render_popup(frame, popup, map_area);
    }

    render_status_bar(frame, app, status_area);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Animal Casualties ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut viewport = app.viewport.clone();
    viewport.width = inner.width as usize * 2;
    viewport.height = inner.height as usize * 4;

    let (cols, rows) = (inner.width as usize, inner.height as usize);
    let cursor_pos = app.mouse_pixel_pos().and_then(|(px, py)| {
        let (cx, cy) = ((px / 2) as u16, (py / 4) as u16);
        (cx < inner.width && cy < inner.height).then_some((cx, cy))
    });

    let widget = MapWidget {
        base: app.map_renderer.render(cols, rows, &viewport),
        markers: app.layer.rasterize(cols, rows, &viewport),
        states_visible: app.map_renderer.settings.show_states && viewport.zoom >= 4.0,
        cursor_pos,
    };
    frame.render_widget(widget, inner);
}

/// Braille base map with casualty markers on top
struct MapWidget {
    base: MapLayers,
    markers: Vec<(ColorResolution, BrailleCanvas)>,
    states_visible: bool,
    cursor_pos: Option<(u16, u16)>,
}

/// Copy raised cells of `canvas` into the buffer. `None` leaves the
/// terminal's default foreground.
fn paint(canvas: &BrailleCanvas, color: Option<Color>, area: Rect, buf: &mut Buffer) {
    for (cx, cy, ch) in canvas.glyphs() {
        if cx >= area.width as usize || cy >= area.height as usize {
            continue;
        }
        let cell = &mut buf[(area.x + cx as u16, area.y + cy as u16)];
        cell.set_char(ch).set_fg(color.unwrap_or(Color::Reset));
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        paint(&self.base.coastlines, Some(Color::Cyan), area, buf);
        let border_color = if self.states_visible {
            Color::Yellow
        } else {
            Color::Cyan
        };
        paint(&self.base.borders, Some(border_color), area, buf);
        paint(&self.base.states, Some(Color::DarkGray), area, buf);

        for (fill, canvas) in &self.markers {
            paint(canvas, fill.color().map(|c| c.to_tui()), area, buf);
        }

        if let Some((cx, cy)) = self.cursor_pos {
            buf[(area.x + cx, area.y + cy)]
                .set_char('╋')
                .set_fg(Color::Red);
        }
    }
}

/// Fit a panel of the given size at (x, y), clipped to `bounds`
fn panel_rect(x: u16, y: u16, width: u16, height: u16, bounds: Rect) -> Rect {
    Rect::new(x, y, width, height).intersection(bounds)
}

fn render_controls(frame: &mut Frame, controls: &FilterControls, bounds: Rect) {
    let area = controls_rect(bounds);
    let key = |d: Dimension| match d {
        Dimension::Animal => "a",
        Dimension::Infrastructure => "i",
        Dimension::State => "",
    };

    let lines: Vec<Line> = FilterControls::ROWS
        .iter()
        .map(|&dimension| {
            Line::from(vec![
                Span::styled(format!("{}: ", dimension), Style::default().fg(Color::Gray)),
                Span::styled(
                    format!("‹{}›", controls.shown(dimension).unwrap_or_default()),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" [{}]", key(dimension)), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Filter "),
        ),
        area,
    );
}

fn render_legend(frame: &mut Frame, app: &App, bounds: Rect) {
    let entries = app.legend.entries();
    let area = legend_rect(entries.len(), bounds);

    let lines: Vec<Line> = entries
        .iter()
        .map(|(label, color)| {
            Line::from(vec![
                Span::styled("● ", Style::default().fg(color.to_tui())),
                Span::raw(*label),
            ])
        })
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        ),
        area,
    );
}

fn render_popup(frame: &mut Frame, popup: &Popup, bounds: Rect) {
    let area = popup_rect(bounds);

    let lines = vec![
        Line::from(Span::styled(
            format!("AnimalType: {}", popup.animal_type()),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Infrastructure: {}", popup.infrastructure())),
        Line::from(Span::styled(
            popup.heading().to_string(),
            Style::default().fg(Color::White),
        )),
        Line::from(vec![
            Span::styled("Source link: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                popup.source().to_string(),
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        ]),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Casualty (Esc to close) "),
        ),
        area,
    );
}

fn toggle_span(on: bool, on_text: &'static str, off_text: &'static str) -> Span<'static> {
    Span::styled(
        if on { on_text } else { off_text },
        Style::default().fg(if on { Color::Green } else { Color::DarkGray }),
    )
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let settings = &app.map_renderer.settings;
    let dim = Style::default().fg(Color::DarkGray);

    let data = match &app.load_state {
        LoadState::Loading => Span::styled("loading… ", Style::default().fg(Color::Yellow)),
        LoadState::Ready => {
            let (shown, total) = app.feature_counts();
            Span::styled(format!("{}/{} shown ", shown, total), Style::default().fg(Color::Green))
        }
        LoadState::Failed(_) => Span::styled("no data ", Style::default().fg(Color::Red)),
    };

    let status = Line::from(vec![
        Span::styled(" Zoom: ", dim),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" (", dim),
        Span::styled(app.lod_level(), Style::default().fg(Color::Magenta)),
        Span::styled(") ", dim),
        data,
        toggle_span(settings.show_borders, "[B]order ", "[b]order "),
        toggle_span(settings.show_states, "[S]tate ", "[s]tate "),
        Span::styled("| ", dim),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(" | a/i:filter hjkl:pan +/-:zoom r:reset q:quit", dim),
    ]);

    frame.render_widget(Paragraph::new(status), area);
}
