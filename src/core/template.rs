//! Textual output templates
//!
//! A template is a plain string with `%...%` placeholders that are replaced
//! with the corresponding [`LogRecord`] fields. Unrecognized placeholders are
//! left untouched so a stray token shows up verbatim in the output instead of
//! vanishing.

use super::record::LogRecord;

/// Template used when none is configured
pub const DEFAULT_TEMPLATE: &str = "%millisecond_format% [%level_string%] %body%";

/// Substitute every recognized placeholder with the record's value
pub fn render(template: &str, record: &LogRecord) -> String {
    template
        .replace("%timestamp_format%", &record.timestamp_format)
        .replace("%timestamp%", &record.timestamp.to_string())
        .replace("%millisecond_format%", &record.millisecond_format)
        .replace("%millisecond%", &record.millisecond.to_string())
        .replace("%level_string%", &record.level_string)
        .replace("%level%", &record.level.value().to_string())
        .replace("%body%", &record.body)
        .replace("%file%", &record.file)
        .replace("%line%", &record.line.to_string())
        .replace("%function%", &record.function)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::LogLevel;

    fn sample_record() -> LogRecord {
        LogRecord::new(LogLevel::Warn, "disk almost full").with_location("src/io.rs", 17, "check")
    }

    #[test]
    fn test_default_template() {
        let record = sample_record();
        let line = render(DEFAULT_TEMPLATE, &record);
        assert_eq!(
            line,
            format!("{} [WARN] disk almost full", record.millisecond_format)
        );
    }

    #[test]
    fn test_all_placeholders_substituted() {
        let template = "%timestamp% %timestamp_format% %millisecond% %millisecond_format% \
                        %level% %level_string% %body% %file% %line% %function%";
        let record = sample_record();
        let line = render(template, &record);

        assert!(!line.contains('%'), "unsubstituted placeholder in {line:?}");
        assert!(line.contains("3 WARN disk almost full src/io.rs 17 check"));
    }

    #[test]
    fn test_timestamp_is_prefix_ordered() {
        // %timestamp% must not eat the longer %timestamp_format% token
        let record = sample_record();
        let line = render("%timestamp_format%", &record);
        assert_eq!(line, record.timestamp_format);
    }

    #[test]
    fn test_unknown_placeholder_left_verbatim() {
        let record = sample_record();
        let line = render("%host% %body%", &record);
        assert!(line.starts_with("%host% "));
    }
}
