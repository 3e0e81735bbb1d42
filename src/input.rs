use crossterm::event::KeyCode;

use crate::model::indicator::Indicator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Quit,
    ToggleIndicator(Indicator),
    CycleTimeframe,
    ToggleColorMode,
    NextSymbol,
    Export,
}

pub fn parse_command(key_code: &KeyCode) -> Option<UiCommand> {
    match key_code {
        KeyCode::Esc => Some(UiCommand::Quit),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => Some(UiCommand::Quit),
            '1' => Some(UiCommand::ToggleIndicator(Indicator::Ema12)),
            '2' => Some(UiCommand::ToggleIndicator(Indicator::Ema26)),
            '3' => Some(UiCommand::ToggleIndicator(Indicator::Bb)),
            '4' => Some(UiCommand::ToggleIndicator(Indicator::Rsi)),
            '5' => Some(UiCommand::ToggleIndicator(Indicator::Volume)),
            't' => Some(UiCommand::CycleTimeframe),
            'm' => Some(UiCommand::ToggleColorMode),
            's' => Some(UiCommand::NextSymbol),
            'e' => Some(UiCommand::Export),
            _ => None,
        },
        _ => None,
    }
}
