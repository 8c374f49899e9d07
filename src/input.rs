//! Maps terminal key and mouse events to game inputs.

use crate::game::{BirdSkin, GameInput, Phase};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

/// What the driver should do with one terminal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Game(GameInput),
    /// Leave immediately, whatever the phase.
    Close,
    None,
}

pub fn map_event(event: &Event, phase: Phase) -> KeyAction {
    match event {
        Event::Key(key) => map_key(key, phase),
        Event::Mouse(mouse) => map_mouse(mouse, phase),
        _ => KeyAction::None,
    }
}

pub fn map_key(key: &KeyEvent, phase: Phase) -> KeyAction {
    // Ignore release and repeat events on terminals that report them
    if key.kind != KeyEventKind::Press {
        return KeyAction::None;
    }

    if key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
    {
        return KeyAction::Close;
    }

    let input = match key.code {
        KeyCode::Char(' ') | KeyCode::Up => GameInput::Flap,
        KeyCode::Char('p') | KeyCode::Char('P') => GameInput::PauseToggle,
        KeyCode::Char('r') | KeyCode::Char('R') => GameInput::Restart,
        KeyCode::Char('q') | KeyCode::Char('Q') => GameInput::Quit,
        KeyCode::Enter => GameInput::Confirm,
        KeyCode::Char(c @ '1'..='9') => GameInput::Select(c as usize - '1' as usize),
        KeyCode::Left => return cycle(phase, -1),
        KeyCode::Right => return cycle(phase, 1),
        _ => return KeyAction::None,
    };
    KeyAction::Game(input)
}

/// A left click flaps, or plays again once the round is over.
pub fn map_mouse(mouse: &MouseEvent, phase: Phase) -> KeyAction {
    match (mouse.kind, phase) {
        (MouseEventKind::Down(MouseButton::Left), Phase::GameOver) => {
            KeyAction::Game(GameInput::Restart)
        }
        (MouseEventKind::Down(MouseButton::Left), _) => KeyAction::Game(GameInput::Flap),
        _ => KeyAction::None,
    }
}

/// Move the selection highlight, wrapping at both ends.
fn cycle(phase: Phase, step: isize) -> KeyAction {
    let Phase::Select { highlighted } = phase else {
        return KeyAction::None;
    };
    let count = BirdSkin::ALL.len() as isize;
    let index = match highlighted {
        Some(skin) => (skin.index() as isize + step).rem_euclid(count),
        None if step > 0 => 0,
        None => count - 1,
    };
    KeyAction::Game(GameInput::Select(index as usize))
}
