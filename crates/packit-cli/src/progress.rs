//! Terminal spinner shown while an archive is being built.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressDrawTarget;
use indicatif::ProgressStyle;
use packit_core::SpinnerRender;

/// Spinner renderer drawing to stderr with indicatif.
///
/// The glyph sequence and timing come from the core indicator; this type
/// only draws. The cursor is hidden while the spinner runs and restored in
/// [`SpinnerRender::finish`].
pub struct CliSpinner {
    bar: ProgressBar,
    term: Term,
    message: String,
}

impl CliSpinner {
    #[must_use]
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        bar.set_style(
            ProgressStyle::with_template("{prefix:.blue.bold} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );

        Self {
            bar,
            term: Term::stderr(),
            message: message.to_string(),
        }
    }

    /// Checks if the spinner can be drawn (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stderr().is_term()
    }
}

impl SpinnerRender for CliSpinner {
    fn start(&mut self) {
        let _ = self.term.hide_cursor();
        self.bar.set_message(self.message.clone());
    }

    fn frame(&mut self, glyph: &str) {
        self.bar.set_prefix(glyph.to_string());
    }

    fn finish(&mut self) {
        self.bar.finish_and_clear();
        let _ = self.term.show_cursor();
    }
}

impl Drop for CliSpinner {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
            let _ = self.term.show_cursor();
        }
    }
}
