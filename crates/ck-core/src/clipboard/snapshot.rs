use chrono::{DateTime, Utc};

/// Text captured from the clipboard at one point in time.
///
/// A snapshot lives for exactly one capture/republish cycle and is passed
/// explicitly between its steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardSnapshot {
    text: String,
    captured_at: DateTime<Utc>,
}

impl ClipboardSnapshot {
    pub fn new(text: String) -> Self {
        Self {
            text,
            captured_at: Utc::now(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Number of UTF-16 code units, terminator excluded.
    pub fn utf16_len(&self) -> usize {
        self.text.encode_utf16().count()
    }

    /// Short, single-line rendering for trace logs.
    pub fn preview(&self, max_chars: usize) -> String {
        let mut preview: String = self
            .text
            .chars()
            .take(max_chars)
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        if self.text.chars().nth(max_chars).is_some() {
            preview.push('…');
        }
        preview
    }
}
