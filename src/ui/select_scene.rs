//! Bird selection screen shown once at startup.

use crate::game::BirdSkin;
use crate::ui::game_common::{
    create_game_layout, render_info_panel_frame, render_status_bar, stat_line,
};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render_select(frame: &mut Frame, area: Rect, highlighted: Option<BirdSkin>, best: u32) {
    let layout = create_game_layout(frame, area, " Flappy Bird ", Color::Cyan, 22);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Choose your bird",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for skin in BirdSkin::ALL {
        lines.push(skin_line(skin, highlighted == Some(skin)));
    }
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        layout.content,
    );

    let (status, color) = match highlighted {
        Some(skin) => (format!("{} bird ready", skin.name()), Color::Green),
        None => ("Pick a bird to start".to_string(), Color::Yellow),
    };
    render_status_bar(
        frame,
        layout.status_bar,
        &status,
        color,
        &[("[1-3/←→]", "Choose"), ("[Enter]", "Start"), ("[Esc]", "Close")],
    );

    let inner = render_info_panel_frame(frame, layout.info_panel);
    let info = vec![
        Line::from(""),
        stat_line("Best", best.to_string(), Color::Yellow),
    ];
    frame.render_widget(Paragraph::new(info), inner);
}

fn skin_line(skin: BirdSkin, selected: bool) -> Line<'static> {
    let (r, g, b) = skin.rgb();
    let marker = if selected { "▶ " } else { "  " };
    let label_style = if selected {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(Color::Gray)
    };

    Line::from(vec![
        Span::styled(marker, Style::default().fg(Color::Yellow)),
        Span::styled(
            "►",
            Style::default()
                .fg(Color::Rgb(r, g, b))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" [{}] {:<7}", skin.index() + 1, skin.name()),
            label_style,
        ),
    ])
}
