//! Terminal output for the `tally` binary
//!
//! Uses `cliclack` for prompts and spinners when attached to a terminal and
//! falls back to plain, prefix-tagged lines in CI or when piped.

mod context;
mod output;
mod progress;
mod prompts;
mod theme;

pub use context::UiContext;
pub use output::{
    intro, key_value, key_value_status, remark, section, step_error_detail, step_info, step_ok,
    step_ok_detail, step_warn_hint,
};
pub use progress::TaskSpinner;
pub use prompts::{confirm, input, password};
pub use theme::{init_theme, TallyTheme};
