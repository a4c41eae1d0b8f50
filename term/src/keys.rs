use crossterm::event::KeyCode;
use genesis_2048_core::Buttons;

/// Maps a key to the joypad button it stands in for.
///
/// Arrows and `hjkl` steer, Enter or `r` is Start, `a` `b` `c` are the face buttons.
pub fn buttons_for(code: KeyCode) -> Option<Buttons> {
    let buttons = match code {
        KeyCode::Up | KeyCode::Char('k') => Buttons::UP,
        KeyCode::Down | KeyCode::Char('j') => Buttons::DOWN,
        KeyCode::Left | KeyCode::Char('h') => Buttons::LEFT,
        KeyCode::Right | KeyCode::Char('l') => Buttons::RIGHT,
        KeyCode::Enter | KeyCode::Char('r') => Buttons::START,
        KeyCode::Char('a') => Buttons::A,
        KeyCode::Char('b') => Buttons::B,
        KeyCode::Char('c') => Buttons::C,
        _ => return None,
    };
    Some(buttons)
}

pub fn is_quit(code: KeyCode) -> bool {
    matches!(code, KeyCode::Char('q') | KeyCode::Esc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vim_keys_match_arrows() {
        assert_eq!(buttons_for(KeyCode::Char('h')), buttons_for(KeyCode::Left));
        assert_eq!(buttons_for(KeyCode::Char('j')), buttons_for(KeyCode::Down));
        assert_eq!(buttons_for(KeyCode::Char('k')), buttons_for(KeyCode::Up));
        assert_eq!(buttons_for(KeyCode::Char('l')), buttons_for(KeyCode::Right));
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        assert_eq!(buttons_for(KeyCode::Char('x')), None);
        assert!(is_quit(KeyCode::Esc));
        assert!(!is_quit(KeyCode::Enter));
    }
}
