//! Keyboard command mapping for the viewer.
//!
//! Single-key bindings read line-buffered from stdin: space or `p`
//! toggles playback, `,`/`.` step frames, `a` cycles speed, and the
//! letter keys toggle overlay layers.

use crate::settings::LayerKind;

/// A user-initiated playback or view command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    PlayPause,
    PrevFrame,
    NextFrame,
    CycleSpeed,
    Toggle(LayerKind),
    Help,
    Quit,
}

/// Map a single key to its command, if any.
pub fn command_for_key(key: char) -> Option<KeyCommand> {
    match key {
        ' ' | 'p' | 'P' => Some(KeyCommand::PlayPause),
        ',' | '<' => Some(KeyCommand::PrevFrame),
        '.' | '>' => Some(KeyCommand::NextFrame),
        'a' | 'A' => Some(KeyCommand::CycleSpeed),
        'g' | 'G' => Some(KeyCommand::Toggle(LayerKind::Geolocation)),
        's' | 'S' => Some(KeyCommand::Toggle(LayerKind::Satellite)),
        'r' | 'R' => Some(KeyCommand::Toggle(LayerKind::Radar)),
        'l' | 'L' => Some(KeyCommand::Toggle(LayerKind::Lightning)),
        'o' | 'O' => Some(KeyCommand::Toggle(LayerKind::Observations)),
        'h' | 'H' | '?' => Some(KeyCommand::Help),
        'q' | 'Q' => Some(KeyCommand::Quit),
        _ => None,
    }
}

/// Keyboard help, printed on request.
pub fn help_text() -> &'static str {
    "\
radar-viewer — keyboard commands (type a key, then Enter)

Playback:
  space, p    Play / pause the animation
  ,  <        Previous frame
  .  >        Next frame
  a           Cycle animation speed (500 / 1000 / 2000 ms)

Layers:
  g           Toggle geolocation
  s           Toggle satellite
  r           Toggle radar
  l           Toggle lightning
  o           Toggle observations

Other:
  h, ?        Show this help
  q           Quit"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_bindings() {
        assert_eq!(command_for_key(' '), Some(KeyCommand::PlayPause));
        assert_eq!(command_for_key('p'), Some(KeyCommand::PlayPause));
        assert_eq!(command_for_key(','), Some(KeyCommand::PrevFrame));
        assert_eq!(command_for_key('<'), Some(KeyCommand::PrevFrame));
        assert_eq!(command_for_key('.'), Some(KeyCommand::NextFrame));
        assert_eq!(command_for_key('>'), Some(KeyCommand::NextFrame));
        assert_eq!(command_for_key('a'), Some(KeyCommand::CycleSpeed));
    }

    #[test]
    fn test_layer_bindings_ignore_case() {
        assert_eq!(
            command_for_key('g'),
            Some(KeyCommand::Toggle(LayerKind::Geolocation))
        );
        assert_eq!(
            command_for_key('S'),
            Some(KeyCommand::Toggle(LayerKind::Satellite))
        );
        assert_eq!(
            command_for_key('R'),
            Some(KeyCommand::Toggle(LayerKind::Radar))
        );
        assert_eq!(
            command_for_key('l'),
            Some(KeyCommand::Toggle(LayerKind::Lightning))
        );
        assert_eq!(
            command_for_key('O'),
            Some(KeyCommand::Toggle(LayerKind::Observations))
        );
    }

    #[test]
    fn test_help_and_quit_bindings() {
        assert_eq!(command_for_key('h'), Some(KeyCommand::Help));
        assert_eq!(command_for_key('H'), Some(KeyCommand::Help));
        assert_eq!(command_for_key('?'), Some(KeyCommand::Help));
        assert_eq!(command_for_key('q'), Some(KeyCommand::Quit));
        assert_eq!(command_for_key('Q'), Some(KeyCommand::Quit));
        assert!(help_text().contains("Play / pause"));
    }

    #[test]
    fn test_unknown_keys_map_to_none() {
        assert_eq!(command_for_key('x'), None);
        assert_eq!(command_for_key('1'), None);
        assert_eq!(command_for_key('\n'), None);
    }
}
