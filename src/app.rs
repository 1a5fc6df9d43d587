use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use biblehub_scraper::{Field, FormController, ScrapeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(Field),
    Submit,
}

/// Tab order: the six selectors in form order, then the button.
const FOCUS_ORDER: [Focus; 7] = [
    Focus::Field(Field::Book),
    Focus::Field(Field::Chapter),
    Focus::Field(Field::Verse),
    Focus::Field(Field::ScrapeType),
    Focus::Field(Field::Commentary),
    Focus::Field(Field::Language),
    Focus::Submit,
];

/// An open dropdown
pub struct Picker {
    pub field: Field,
    pub options: Vec<String>,
    pub state: ListState,
}

pub struct App {
    pub should_quit: bool,
    pub focus: Focus,
    pub picker: Option<Picker>,
    pub controller: FormController,

    // Status line (errors, cancellation notices)
    pub status: Option<String>,

    // Results panel
    pub result_scroll: u16,
    pub result_height: u16,
    pub results_area: Option<Rect>,

    // Animation state
    pub animation_frame: u8,
}

impl App {
    pub fn new(controller: FormController) -> Self {
        Self {
            should_quit: false,
            focus: Focus::Field(Field::Book),
            picker: None,
            controller,
            status: None,
            result_scroll: 0,
            result_height: 0,
            results_area: None,
            animation_frame: 0,
        }
    }

    fn focus_index(&self) -> usize {
        FOCUS_ORDER.iter().position(|f| *f == self.focus).unwrap_or(0)
    }

    pub fn focus_next(&mut self) {
        let i = self.focus_index();
        self.focus = FOCUS_ORDER[(i + 1) % FOCUS_ORDER.len()];
    }

    pub fn focus_prev(&mut self) {
        let i = self.focus_index();
        self.focus = FOCUS_ORDER[(i + FOCUS_ORDER.len() - 1) % FOCUS_ORDER.len()];
    }

    /// Enter on the focused control: open its dropdown or press the button.
    pub fn activate(&mut self) {
        match self.focus {
            Focus::Field(field) => self.open_picker(field),
            Focus::Submit => self.submit(),
        }
    }

    pub fn open_picker(&mut self, field: Field) {
        let options = self.controller.options(field);
        if options.is_empty() {
            return;
        }
        let current = self.controller.selection().get(field);
        let selected = options.iter().position(|o| o == current).unwrap_or(0);

        let mut state = ListState::default();
        state.select(Some(selected));
        self.picker = Some(Picker { field, options, state });
    }

    pub fn close_picker(&mut self) {
        self.picker = None;
    }

    pub fn picker_nav_down(&mut self) {
        if let Some(picker) = &mut self.picker {
            let len = picker.options.len();
            if len > 0 {
                let i = picker.state.selected().unwrap_or(0);
                picker.state.select(Some((i + 1).min(len - 1)));
            }
        }
    }

    pub fn picker_nav_up(&mut self) {
        if let Some(picker) = &mut self.picker {
            let i = picker.state.selected().unwrap_or(0);
            picker.state.select(Some(i.saturating_sub(1)));
        }
    }

    pub fn picker_first(&mut self) {
        if let Some(picker) = &mut self.picker {
            picker.state.select(Some(0));
        }
    }

    pub fn picker_last(&mut self) {
        if let Some(picker) = &mut self.picker {
            let len = picker.options.len();
            if len > 0 {
                picker.state.select(Some(len - 1));
            }
        }
    }

    /// Jump to the next option whose label starts with `c`, wrapping around.
    pub fn picker_jump(&mut self, c: char) {
        let Some(picker) = &mut self.picker else {
            return;
        };
        let catalog = self.controller.catalog();
        let wanted = c.to_lowercase().to_string();
        let len = picker.options.len();
        let start = picker.state.selected().map(|i| i + 1).unwrap_or(0);

        for offset in 0..len {
            let idx = (start + offset) % len;
            let label = catalog.display_value(picker.field, &picker.options[idx]);
            if label.to_lowercase().starts_with(&wanted) {
                picker.state.select(Some(idx));
                return;
            }
        }
    }

    pub fn picker_confirm(&mut self) {
        if let Some(picker) = self.picker.take() {
            if let Some(value) = picker.state.selected().and_then(|i| picker.options.get(i)) {
                self.controller.select(picker.field, value.clone());
            }
        }
    }

    /// Unset the focused field. Required fields stay as they are.
    pub fn clear_focused(&mut self) {
        if let Focus::Field(field) = self.focus {
            if !field.is_required() {
                self.controller.clear(field);
            }
        }
    }

    pub fn submit(&mut self) {
        match self.controller.submit() {
            Ok(()) => {
                self.status = None;
                self.animation_frame = 0;
            }
            Err(ScrapeError::NotReady) => {}
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    pub fn cancel(&mut self) {
        if self.controller.cancel() {
            self.status = Some("Scrape cancelled".to_string());
        }
    }

    pub fn reset(&mut self) {
        self.controller.reset();
        self.picker = None;
        self.focus = Focus::Field(Field::Book);
        self.status = None;
    }

    /// Called on every tick: advance the spinner and collect a finished scrape.
    pub fn tick(&mut self) {
        if self.controller.is_loading() {
            self.animation_frame = self.animation_frame.wrapping_add(1);
        }
        match self.controller.poll() {
            Some(Ok(())) => {
                self.status = None;
                self.result_scroll = 0;
            }
            Some(Err(e)) => self.status = Some(e.to_string()),
            None => {}
        }
    }

    fn result_lines(&self) -> u16 {
        self.controller
            .result()
            .map(|r| r.lines().count() as u16)
            .unwrap_or(0)
    }

    pub fn scroll_results_down(&mut self, by: u16) {
        let max_scroll = self.result_lines().saturating_sub(self.result_height);
        self.result_scroll = (self.result_scroll + by).min(max_scroll);
    }

    pub fn scroll_results_up(&mut self, by: u16) {
        self.result_scroll = self.result_scroll.saturating_sub(by);
    }
}
