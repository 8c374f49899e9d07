//! Play-area rendering: sky, pipes, ground, the bird and the HUD.

use crate::config::PlayfieldConfig;
use crate::game::{Bird, Phase, Pipe, Session};
use crate::ui::game_common::{
    create_game_layout, render_game_over_overlay, render_info_panel_frame,
    render_paused_overlay, render_status_bar, stat_line,
};
use rand::Rng;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const GROUND_COLOR: Color = Color::Rgb(139, 90, 43);
const PIPE_COLOR: Color = Color::Green;

/// Tilt past which the bird is drawn pointing up or down.
const GLYPH_TILT: f32 = 10.0;

/// Render a round in progress, paused or finished.
pub fn render_flappy<R: Rng>(frame: &mut Frame, area: Rect, session: &Session<R>) {
    let layout = create_game_layout(frame, area, " Flappy Bird ", Color::Cyan, 22);

    render_play_area(frame, layout.content, session);
    render_status_bar_content(frame, layout.status_bar, session.phase());
    render_info_panel(frame, layout.info_panel, session);

    match session.phase() {
        Phase::Paused => render_paused_overlay(frame, layout.content),
        Phase::GameOver => render_game_over_overlay(
            frame,
            layout.content,
            session.score(),
            session.high_score(),
        ),
        _ => {}
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Sky,
    Pipe,
    Ground,
}

/// Scales world coordinates onto a grid of terminal cells.
#[derive(Debug, Clone, Copy)]
struct Viewport {
    cols: u16,
    rows: u16,
    world_width: f32,
    world_height: f32,
}

impl Viewport {
    fn new(area: Rect, playfield: &PlayfieldConfig) -> Self {
        Self {
            cols: area.width,
            rows: area.height,
            world_width: playfield.width,
            world_height: playfield.height,
        }
    }

    /// World point sampled at the centre of a cell.
    fn world_at(&self, col: u16, row: u16) -> (f32, f32) {
        (
            (col as f32 + 0.5) * self.world_width / self.cols as f32,
            (row as f32 + 0.5) * self.world_height / self.rows as f32,
        )
    }

    /// Cell containing a world point, if it is on screen.
    fn cell_of(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if x < 0.0 || y < 0.0 || x >= self.world_width || y >= self.world_height {
            return None;
        }
        let col = (x * self.cols as f32 / self.world_width) as u16;
        let row = (y * self.rows as f32 / self.world_height) as u16;
        Some((col.min(self.cols - 1), row.min(self.rows - 1)))
    }
}

fn classify(x: f32, y: f32, ground_y: f32, pipes: &[Pipe]) -> Cell {
    if y >= ground_y {
        return Cell::Ground;
    }
    let solid = pipes.iter().any(|pipe| {
        x >= pipe.x() && x < pipe.right() && (y < pipe.gap_top() || y >= pipe.gap_bottom())
    });
    if solid {
        Cell::Pipe
    } else {
        Cell::Sky
    }
}

/// Up while climbing, level, down while diving.
fn bird_glyph(rotation: f32) -> &'static str {
    if rotation < -GLYPH_TILT {
        "▲"
    } else if rotation > GLYPH_TILT {
        "▼"
    } else {
        "►"
    }
}

fn bird_cell(bird: &Bird, view: &Viewport) -> Option<(u16, u16)> {
    view.cell_of(
        bird.x() + bird.width() / 2.0,
        bird.y() + bird.height() / 2.0,
    )
}

fn render_play_area<R: Rng>(frame: &mut Frame, area: Rect, session: &Session<R>) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let playfield = &session.config().playfield;
    let view = Viewport::new(area, playfield);
    let ground_y = playfield.ground_y();
    let pipes = session.pipes().pipes();
    let bird = session
        .bird()
        .and_then(|bird| bird_cell(bird, &view).map(|cell| (bird, cell)));

    let mut lines = Vec::with_capacity(area.height as usize);
    for row in 0..area.height {
        let mut spans = Vec::with_capacity(area.width as usize);
        for col in 0..area.width {
            if let Some((bird, cell)) = bird {
                if cell == (col, row) {
                    let (r, g, b) = bird.skin().rgb();
                    spans.push(Span::styled(
                        bird_glyph(bird.rotation()),
                        Style::default()
                            .fg(Color::Rgb(r, g, b))
                            .add_modifier(Modifier::BOLD),
                    ));
                    continue;
                }
            }

            let (x, y) = view.world_at(col, row);
            let span = match classify(x, y, ground_y, pipes) {
                Cell::Sky => Span::raw(" "),
                Cell::Pipe => Span::styled("█", Style::default().fg(PIPE_COLOR)),
                Cell::Ground => Span::styled("▓", Style::default().fg(GROUND_COLOR)),
            };
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_status_bar_content(frame: &mut Frame, area: Rect, phase: Phase) {
    match phase {
        Phase::Paused => render_status_bar(
            frame,
            area,
            "Paused",
            Color::Yellow,
            &[("[P/Space]", "Resume"), ("[Esc]", "Close")],
        ),
        Phase::GameOver => render_status_bar(
            frame,
            area,
            "Crashed!",
            Color::Red,
            &[("[R/Click]", "Restart"), ("[Q]", "Quit")],
        ),
        _ => render_status_bar(
            frame,
            area,
            "Fly through the gaps",
            Color::Green,
            &[("[Space/Up/Click]", "Flap"), ("[P]", "Pause"), ("[Esc]", "Close")],
        ),
    }
}

fn render_info_panel<R: Rng>(frame: &mut Frame, area: Rect, session: &Session<R>) {
    let inner = render_info_panel_frame(frame, area);
    if inner.height < 2 || inner.width < 4 {
        return;
    }

    let mut lines = vec![
        Line::from(""),
        stat_line("Score", session.score().to_string(), Color::White),
        stat_line("Best", session.high_score().to_string(), Color::Yellow),
        Line::from(""),
    ];
    if let Some(bird) = session.bird() {
        let (r, g, b) = bird.skin().rgb();
        lines.push(stat_line("Bird", bird.skin().name().to_string(), Color::Rgb(r, g, b)));
    }
    lines.push(stat_line(
        "Round",
        session.rounds_played().to_string(),
        Color::Cyan,
    ));

    frame.render_widget(Paragraph::new(lines), inner);
}
