pub mod flappy_scene;
pub mod game_common;
pub mod select_scene;

use crate::game::{Phase, Session};
use rand::Rng;
use ratatui::Frame;

/// Draw the whole screen for the current phase.
pub fn draw<R: Rng>(frame: &mut Frame, session: &Session<R>) {
    let area = frame.size();
    match session.phase() {
        Phase::Select { highlighted } => {
            select_scene::render_select(frame, area, highlighted, session.high_score())
        }
        Phase::Playing | Phase::Paused | Phase::GameOver => {
            flappy_scene::render_flappy(frame, area, session)
        }
    }
}
