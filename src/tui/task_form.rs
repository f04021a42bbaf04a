//! Task form handling for the terminal user interface.
//!
//! This module provides the `TaskForm` used by the add-task popup: four
//! text fields walked in a fixed order and turned into a `TaskRecord` on
//! submit.

use crate::error::Result;
use crate::task::TaskRecord;
use crate::tui::input::InputField;

/// Order constants for the form's fields.
pub const TITLE_ORDER: usize = 0;
pub const DESCRIPTION_ORDER: usize = 1;
pub const REWARD_ORDER: usize = 2;
pub const DEADLINE_ORDER: usize = 3;

const FIELD_COUNT: usize = 4;

/// Task form for the add-task popup
#[derive(Debug, Clone)]
pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    pub reward: InputField,
    pub deadline: InputField,
    pub current_field: usize,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskForm {
    /// Create an empty form with the title field focused.
    pub fn new() -> Self {
        let mut form = Self {
            title: InputField::new(),
            description: InputField::new(),
            reward: InputField::new(),
            deadline: InputField::new(),
            current_field: TITLE_ORDER,
        };
        form.update_active_field();
        form
    }

    /// Form filled in from a generated task, left open for review.
    pub fn prefilled(title: &str, description: &str, reward: &str) -> Self {
        let mut form = Self::new();
        form.title = InputField::with_value(title);
        form.description = InputField::with_value(description);
        form.reward = InputField::with_value(reward);
        form.update_active_field();
        form
    }

    /// Get mutable references to all input fields in visual order.
    pub fn fields_mut(&mut self) -> [&mut InputField; FIELD_COUNT] {
        [&mut self.title, &mut self.description, &mut self.reward, &mut self.deadline]
    }

    /// Fields in visual order, for rendering.
    pub fn fields(&self) -> [&InputField; FIELD_COUNT] {
        [&self.title, &self.description, &self.reward, &self.deadline]
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
        self.update_active_field();
    }

    pub fn prev_field(&mut self) {
        self.current_field = (self.current_field + FIELD_COUNT - 1) % FIELD_COUNT;
        self.update_active_field();
    }

    /// Update which field is currently active for editing.
    pub fn update_active_field(&mut self) {
        let current = self.current_field;
        for (i, field) in self.fields_mut().into_iter().enumerate() {
            field.active = i == current;
        }
    }

    fn current_mut(&mut self) -> &mut InputField {
        match self.current_field {
            DESCRIPTION_ORDER => &mut self.description,
            REWARD_ORDER => &mut self.reward,
            DEADLINE_ORDER => &mut self.deadline,
            _ => &mut self.title,
        }
    }

    pub fn handle_char(&mut self, c: char) {
        self.current_mut().handle_char(c);
    }

    pub fn handle_backspace(&mut self) {
        self.current_mut().handle_backspace();
    }

    pub fn handle_delete(&mut self) {
        self.current_mut().handle_delete();
    }

    /// Handle left/right arrow keys for cursor movement.
    pub fn handle_left_right(&mut self, right: bool) {
        let field = self.current_mut();
        if right {
            field.move_cursor_right();
        } else {
            field.move_cursor_left();
        }
    }

    /// Build the record; a blank title is a validation error.
    pub fn to_record(&self) -> Result<TaskRecord> {
        TaskRecord::new(
            &self.title.value,
            &self.description.value,
            Some(self.reward.value.as_str()),
            Some(self.deadline.value.as_str()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::fields::Column;

    #[test]
    fn test_field_cycle() {
        let mut form = TaskForm::new();
        assert!(form.title.active);
        form.prev_field();
        assert_eq!(form.current_field, DEADLINE_ORDER);
        assert!(form.deadline.active && !form.title.active);
        form.next_field();
        form.next_field();
        assert_eq!(form.current_field, DESCRIPTION_ORDER);
    }

    #[test]
    fn test_typing_goes_to_current_field() {
        let mut form = TaskForm::new();
        "Gym".chars().for_each(|c| form.handle_char(c));
        form.next_field();
        form.next_field();
        "Shake".chars().for_each(|c| form.handle_char(c));
        let record = form.to_record().unwrap();
        assert_eq!(record.title, "Gym");
        assert_eq!(record.description, "");
        assert_eq!(record.reward.as_deref(), Some("Shake"));
        assert_eq!(record.deadline, None);
        assert_eq!(record.column, Column::Pending);
    }

    #[test]
    fn test_prefilled_from_generated_task() {
        let form = TaskForm::prefilled("Homework", "Finish it until 22:00", "Good mark");
        assert!(form.title.active);
        assert_eq!(form.title.cursor, 8);
        let record = form.to_record().unwrap();
        assert_eq!(record.description, "Finish it until 22:00");
        assert_eq!(record.reward.as_deref(), Some("Good mark"));
    }

    #[test]
    fn test_blank_title_rejected() {
        let mut form = TaskForm::new();
        form.handle_char(' ');
        assert!(matches!(form.to_record(), Err(Error::Validation(_))));
    }
}
