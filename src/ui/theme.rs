//! cliclack theme

use cliclack::ThemeState;
use console::Style;

/// Green bars for a finance tool; errors stay red
#[derive(Debug, Clone, Default)]
pub struct TallyTheme;

impl cliclack::Theme for TallyTheme {
    fn bar_color(&self, state: &ThemeState) -> Style {
        match state {
            ThemeState::Active => Style::new().green(),
            ThemeState::Error(_) => Style::new().red(),
            ThemeState::Cancel => Style::new().dim(),
            ThemeState::Submit => Style::new().green().dim(),
        }
    }

    fn state_symbol_color(&self, state: &ThemeState) -> Style {
        match state {
            ThemeState::Error(_) => Style::new().red(),
            ThemeState::Cancel => Style::new().dim(),
            ThemeState::Active | ThemeState::Submit => Style::new().green(),
        }
    }
}

/// Install [`TallyTheme`] for all prompts
pub fn init_theme() {
    cliclack::set_theme(TallyTheme);
}
