pub mod prompt;
pub mod report;

pub use prompt::{PromptError, Prompter};
pub use report::{print_progress, render_event, render_outcome};
