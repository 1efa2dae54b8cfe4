/// Text shown in the output area under the controls.
#[derive(Default, Debug, Clone)]
pub struct OutputLog {
    text: String,
}

impl OutputLog {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Tool output goes through here untouched.
    pub fn replace(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn append_line(&mut self, line: &str) {
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
        self.text.push_str(line);
    }

    /// For lines the app writes itself.
    pub fn append_message(&mut self, msg: &str) {
        let line = format!("[{}] {}", chrono::Local::now().format("%H:%M:%S"), msg);
        self.append_line(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_is_verbatim() {
        let mut log = OutputLog::default();
        log.append_line("old");
        log.replace("RunSICLE Errors:\n  bad input\n");
        assert_eq!(log.text(), "RunSICLE Errors:\n  bad input\n");
    }

    #[test]
    fn test_append_line_separates_entries() {
        let mut log = OutputLog::default();
        log.append_line("first");
        log.append_line("second");
        assert_eq!(log.text(), "first\nsecond");

        log.replace("ends with newline\n");
        log.append_line("third");
        assert_eq!(log.text(), "ends with newline\nthird");
    }

    #[test]
    fn test_append_message_is_timestamped() {
        let mut log = OutputLog::default();
        log.append_message("Coordinates saved successfully.");
        let text = log.text();
        assert!(text.starts_with('['), "{}", text);
        assert!(text.ends_with("] Coordinates saved successfully."), "{}", text);

        log.clear();
        assert!(log.is_empty());
    }
}
