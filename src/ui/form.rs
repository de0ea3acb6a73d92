//! Input form state and key handling. No rendering here.

use crate::preprocessing::{Applicant, Category, AGE_RANGE, BMI_RANGE, CHILDREN_RANGE};
use crossterm::event::KeyCode;

/// Form rows, top to bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Age,
    Sex,
    Bmi,
    Children,
    Smoker,
    Region,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Age,
        Field::Sex,
        Field::Bmi,
        Field::Children,
        Field::Smoker,
        Field::Region,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Age => "Age",
            Field::Sex => "Sex",
            Field::Bmi => "BMI",
            Field::Children => "Children",
            Field::Smoker => "Smoker",
            Field::Region => "Region",
        }
    }

    /// Range shown next to numeric fields.
    pub fn hint(self) -> &'static str {
        match self {
            Field::Age => "18-100",
            Field::Bmi => "10.0-60.0",
            Field::Children => "0-10",
            _ => "</>",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Field::Age | Field::Bmi | Field::Children)
    }

    fn index(self) -> usize {
        Field::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Field {
        Field::ALL[(self.index() + 1) % Field::ALL.len()]
    }

    fn prev(self) -> Field {
        Field::ALL[(self.index() + Field::ALL.len() - 1) % Field::ALL.len()]
    }
}

/// What a key press asks of the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormAction {
    None,
    Predict,
    Quit,
}

pub struct FormState {
    applicant: Applicant,
    focus: Field,
    /// Uncommitted text of the focused numeric field.
    buffer: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    pub fn new() -> Self {
        Self {
            applicant: Applicant::default(),
            focus: Field::Age,
            buffer: None,
        }
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    /// Last committed values.
    pub fn applicant(&self) -> Applicant {
        self.applicant
    }

    pub fn is_editing(&self) -> bool {
        self.buffer.is_some()
    }

    /// Text to render for `field`, including uncommitted input.
    pub fn display_value(&self, field: Field) -> String {
        if field == self.focus {
            if let Some(text) = &self.buffer {
                return text.clone();
            }
        }
        let a = &self.applicant;
        match field {
            Field::Age => a.age.to_string(),
            Field::Sex => a.sex.to_string(),
            Field::Bmi => format!("{:.1}", a.bmi),
            Field::Children => a.children.to_string(),
            Field::Smoker => a.smoker.to_string(),
            Field::Region => a.region.to_string(),
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) -> FormAction {
        match key {
            KeyCode::Esc | KeyCode::Char('q') => return FormAction::Quit,
            KeyCode::Enter => {
                self.commit();
                return FormAction::Predict;
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.commit();
                self.focus = self.focus.prev();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.commit();
                self.focus = self.focus.next();
            }
            KeyCode::Left => {
                self.commit();
                self.step(-1);
            }
            KeyCode::Right => {
                self.commit();
                self.step(1);
            }
            KeyCode::Backspace if self.focus.is_numeric() => {
                let current = self.display_value(self.focus);
                self.buffer.get_or_insert(current).pop();
            }
            KeyCode::Char(c) if self.accepts(c) => {
                self.buffer.get_or_insert_with(String::new).push(c);
            }
            _ => {}
        }
        FormAction::None
    }

    fn accepts(&self, c: char) -> bool {
        match self.focus {
            Field::Age | Field::Children => c.is_ascii_digit(),
            Field::Bmi => c.is_ascii_digit() || (c == '.' && !self.buffer_has_dot()),
            _ => false,
        }
    }

    fn buffer_has_dot(&self) -> bool {
        self.buffer.as_deref().is_some_and(|b| b.contains('.'))
    }

    /// Parse and clamp the pending text; unparsable text is dropped.
    pub fn commit(&mut self) {
        let Some(text) = self.buffer.take() else {
            return;
        };
        let a = &mut self.applicant;
        match self.focus {
            Field::Age => {
                if let Ok(v) = text.parse::<u32>() {
                    a.age = v.clamp(*AGE_RANGE.start(), *AGE_RANGE.end());
                }
            }
            Field::Bmi => {
                if let Ok(v) = text.parse::<f64>() {
                    if v.is_finite() {
                        a.bmi = v.clamp(*BMI_RANGE.start(), *BMI_RANGE.end());
                    }
                }
            }
            Field::Children => {
                if let Ok(v) = text.parse::<u32>() {
                    a.children = v.clamp(*CHILDREN_RANGE.start(), *CHILDREN_RANGE.end());
                }
            }
            _ => {}
        }
    }

    fn step(&mut self, delta: i32) {
        let a = &mut self.applicant;
        match self.focus {
            Field::Age => {
                let v = (a.age as i64 + delta as i64).max(0) as u32;
                a.age = v.clamp(*AGE_RANGE.start(), *AGE_RANGE.end());
            }
            Field::Bmi => {
                let tenths = (a.bmi * 10.0).round() + delta as f64;
                a.bmi = (tenths / 10.0).clamp(*BMI_RANGE.start(), *BMI_RANGE.end());
            }
            Field::Children => {
                let v = (a.children as i64 + delta as i64).max(0) as u32;
                a.children = v.clamp(*CHILDREN_RANGE.start(), *CHILDREN_RANGE.end());
            }
            Field::Sex => a.sex = cycle(a.sex, delta),
            Field::Smoker => a.smoker = cycle(a.smoker, delta),
            Field::Region => a.region = cycle(a.region, delta),
        }
    }
}

fn cycle<C: Category + PartialEq>(current: C, delta: i32) -> C {
    let n = C::ALL.len() as i64;
    let idx = C::ALL.iter().position(|c| *c == current).unwrap_or(0) as i64;
    C::ALL[(idx + delta as i64).rem_euclid(n) as usize]
}
