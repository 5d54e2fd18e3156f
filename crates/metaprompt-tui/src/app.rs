//! TUI-local state (not shared with generation tasks).

use metaprompt::playground::Side;

use crate::clipboard::{ArboardClipboard, ClipboardWriter};

/// Input mode for the TUI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InputMode {
    /// Normal mode: single-key commands, arrow keys scroll.
    Normal,
    /// Typing into the focused prompt editor or the test input.
    Editing,
    /// Typing a file path for save or load.
    PathEntry(PathAction),
    /// The about popup is open; any key closes it.
    About,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PathAction {
    Save,
    Load,
}

impl PathAction {
    pub(crate) fn label(self) -> &'static str {
        match self {
            PathAction::Save => "Save to",
            PathAction::Load => "Load from",
        }
    }
}

/// Which pane receives edits, scroll, and pane-specific commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Focus {
    Prompt(Side),
    Output(Side),
    TestInput,
    Log,
}

impl Focus {
    /// Tab order. The log pane only joins it while visible.
    const CYCLE: [Focus; 6] = [
        Focus::Prompt(Side::A),
        Focus::Prompt(Side::B),
        Focus::Output(Side::A),
        Focus::Output(Side::B),
        Focus::TestInput,
        Focus::Log,
    ];

    fn slot(self) -> usize {
        match self {
            Focus::Prompt(Side::A) => 0,
            Focus::Prompt(Side::B) => 1,
            Focus::Output(Side::A) => 2,
            Focus::Output(Side::B) => 3,
            Focus::TestInput => 4,
            Focus::Log => 5,
        }
    }

    /// The side a pane belongs to, if any.
    pub(crate) fn side(self) -> Option<Side> {
        match self {
            Focus::Prompt(side) | Focus::Output(side) => Some(side),
            Focus::TestInput | Focus::Log => None,
        }
    }

    /// Panes that accept typed text.
    pub(crate) fn is_editable(self) -> bool {
        matches!(self, Focus::Prompt(_) | Focus::TestInput)
    }
}

/// TUI-local state (not shared with generation tasks).
pub(crate) struct App {
    pub(crate) input_mode: InputMode,
    /// Path being typed in [`InputMode::PathEntry`].
    pub(crate) path_buffer: String,
    pub(crate) focus: Focus,
    /// Whether the logs pane is visible (toggled with `,`).
    pub(crate) show_logs: bool,
    /// Top line shown in each text pane, indexed like the tab order.
    pub(crate) scroll: [usize; 5],
    /// Offset from the bottom of the log (0 = follow tail).
    pub(crate) log_scroll: usize,
    /// Target of the copy action.
    pub(crate) clipboard: Box<dyn ClipboardWriter>,
    pub(crate) should_quit: bool,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            input_mode: InputMode::Normal,
            path_buffer: String::new(),
            focus: Focus::Prompt(Side::A),
            show_logs: false,
            scroll: [0; 5],
            log_scroll: 0,
            clipboard: Box::new(ArboardClipboard::default()),
            should_quit: false,
        }
    }

    pub(crate) fn focus_next(&mut self) {
        self.focus = self.step_focus(1);
    }

    pub(crate) fn focus_prev(&mut self) {
        self.focus = self.step_focus(Focus::CYCLE.len() - 1);
    }

    fn step_focus(&self, step: usize) -> Focus {
        let len = Focus::CYCLE.len();
        let mut slot = self.focus.slot();
        loop {
            slot = (slot + step) % len;
            let next = Focus::CYCLE[slot];
            if next != Focus::Log || self.show_logs {
                return next;
            }
        }
    }

    /// Toggle the log pane, moving focus off it when it hides.
    pub(crate) fn toggle_logs(&mut self) {
        self.show_logs = !self.show_logs;
        if self.show_logs {
            self.focus = Focus::Log;
        } else if self.focus == Focus::Log {
            self.focus = Focus::Prompt(Side::A);
        }
    }

    /// Top line of a text pane. The log pane scrolls from the bottom instead.
    pub(crate) fn scroll_of(&self, focus: Focus) -> usize {
        match focus {
            Focus::Log => 0,
            other => self.scroll[other.slot()],
        }
    }

    /// Scroll the focused pane up by `lines`.
    pub(crate) fn scroll_up(&mut self, lines: usize) {
        match self.focus {
            Focus::Log => self.log_scroll = self.log_scroll.saturating_add(lines),
            other => {
                let top = &mut self.scroll[other.slot()];
                *top = top.saturating_sub(lines);
            }
        }
    }

    /// Scroll the focused pane down by `lines`. Rendering clamps the result.
    pub(crate) fn scroll_down(&mut self, lines: usize) {
        match self.focus {
            Focus::Log => self.log_scroll = self.log_scroll.saturating_sub(lines),
            other => {
                let top = &mut self.scroll[other.slot()];
                *top = top.saturating_add(lines);
            }
        }
    }

    /// Jump to the end of the focused pane.
    pub(crate) fn scroll_to_end(&mut self) {
        match self.focus {
            Focus::Log => self.log_scroll = 0,
            other => self.scroll[other.slot()] = usize::MAX,
        }
    }

    pub(crate) fn scroll_to_top(&mut self, focus: Focus) {
        match focus {
            Focus::Log => {}
            other => self.scroll[other.slot()] = 0,
        }
    }
}
