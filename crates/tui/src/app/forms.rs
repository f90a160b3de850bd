/// A text field of a terminal form.
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    pub masked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct FormMessage {
    pub level: MessageLevel,
    pub text: String,
}

/// Ordered fields with a focus cursor and an optional banner.
#[derive(Debug, Clone)]
pub struct Form {
    pub title: &'static str,
    pub fields: Vec<FormField>,
    pub focus: usize,
    pub message: Option<FormMessage>,
}

impl Form {
    pub fn new(title: &'static str, labels: &[&'static str]) -> Self {
        Self {
            title,
            fields: labels
                .iter()
                .map(|&label| FormField {
                    label,
                    value: String::new(),
                    masked: false,
                })
                .collect(),
            focus: 0,
            message: None,
        }
    }

    /// Marks the fields at `indexes` as password inputs.
    #[must_use]
    pub fn masked(mut self, indexes: &[usize]) -> Self {
        for &i in indexes {
            if let Some(field) = self.fields.get_mut(i) {
                field.masked = true;
            }
        }
        self
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields
            .get(index)
            .map(|f| f.value.trim())
            .unwrap_or_default()
    }

    /// Untrimmed value, for passwords.
    pub fn raw(&self, index: usize) -> &str {
        self.fields
            .get(index)
            .map(|f| f.value.as_str())
            .unwrap_or_default()
    }

    pub fn set(&mut self, index: usize, value: impl Into<String>) {
        if let Some(field) = self.fields.get_mut(index) {
            field.value = value.into();
        }
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn push(&mut self, ch: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.push(ch);
        }
    }

    pub fn pop(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
    }

    pub fn clear_values(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
        }
        self.focus = 0;
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.message = Some(FormMessage {
            level: MessageLevel::Info,
            text: text.into(),
        });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.message = Some(FormMessage {
            level: MessageLevel::Error,
            text: text.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = Form::new("t", &["a", "b", "c"]);
        form.prev_field();
        assert_eq!(form.focus, 2);
        form.next_field();
        assert_eq!(form.focus, 0);
    }

    #[test]
    fn typing_goes_to_focused_field() {
        let mut form = Form::new("t", &["a", "b"]).masked(&[1]);
        form.push('x');
        form.next_field();
        form.push(' ');
        form.push('y');
        form.pop();
        assert_eq!(form.value(0), "x");
        assert_eq!(form.raw(1), " ");
        assert_eq!(form.value(1), "");
        assert!(form.fields[1].masked);
    }
}
