use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Quit,
    Pause,
    ToggleHud,
    Restart,
    ToggleTouch,
    Faster,
    Slower,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InputEvent {
    PointerMove { col: u16, row: u16 },
    Resize { cols: u16, rows: u16 },
    Action(Action),
}

pub(crate) fn collect_input_nonblocking(max_wait: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_wait);
    while event::poll(timeout)? {
        if let Some(ev) = translate(event::read()?) {
            out.push(ev);
            if out.len() >= 64 {
                break;
            }
        }
    }
    Ok(out)
}

pub(crate) fn translate(ev: Event) -> Option<InputEvent> {
    match ev {
        Event::Resize(cols, rows) => Some(InputEvent::Resize { cols, rows }),
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Moved | MouseEventKind::Drag(_),
            column,
            row,
            ..
        }) => Some(InputEvent::PointerMove { col: column, row }),
        Event::Key(k) if k.kind == KeyEventKind::Press => {
            map_key(k.code, k.modifiers).map(InputEvent::Action)
        }
        _ => None,
    }
}

fn map_key(code: KeyCode, mods: KeyModifiers) -> Option<Action> {
    if mods.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('c')) {
        return Some(Action::Quit);
    }
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(' ') => Some(Action::Pause),
        KeyCode::Char('h') | KeyCode::Char('H') => Some(Action::ToggleHud),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Restart),
        KeyCode::Char('t') | KeyCode::Char('T') => Some(Action::ToggleTouch),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::Faster),
        KeyCode::Char('-') | KeyCode::Char('_') => Some(Action::Slower),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, MouseButton};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_translate_pointer_moves() {
        assert_eq!(
            translate(mouse(MouseEventKind::Moved, 3, 4)),
            Some(InputEvent::PointerMove { col: 3, row: 4 })
        );
        assert_eq!(
            translate(mouse(MouseEventKind::Drag(MouseButton::Left), 1, 2)),
            Some(InputEvent::PointerMove { col: 1, row: 2 })
        );
        assert_eq!(translate(mouse(MouseEventKind::Down(MouseButton::Left), 1, 2)), None);
    }

    #[test]
    fn test_translate_resize() {
        assert_eq!(
            translate(Event::Resize(120, 40)),
            Some(InputEvent::Resize { cols: 120, rows: 40 })
        );
    }

    #[test]
    fn test_translate_keys() {
        let key = |c| Event::Key(KeyEvent::new(c, KeyModifiers::NONE));
        assert_eq!(
            translate(key(KeyCode::Char('q'))),
            Some(InputEvent::Action(Action::Quit))
        );
        assert_eq!(
            translate(key(KeyCode::Char('t'))),
            Some(InputEvent::Action(Action::ToggleTouch))
        );
        assert_eq!(
            translate(key(KeyCode::Char(' '))),
            Some(InputEvent::Action(Action::Pause))
        );
        assert_eq!(translate(key(KeyCode::Char('z'))), None);
        assert_eq!(
            translate(Event::Key(KeyEvent::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL
            ))),
            Some(InputEvent::Action(Action::Quit))
        );
    }
}
