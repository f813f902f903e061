//! UI Builder module for formatting reply messages

// Import localization
use crate::localization::{t_args_lang, t_lang};

// Import database types
use crate::db::ItemSummary;

/// Greeting with the command summary
pub fn format_welcome_message(language_code: Option<&str>) -> String {
    [
        t_lang("welcome-title", language_code),
        t_lang("welcome-add", language_code),
        t_lang("welcome-list", language_code),
        t_lang("welcome-remove", language_code),
    ]
    .join("\n")
}

/// Format items as a bulleted list, or the empty-list notice
pub fn format_items_list(items: &[ItemSummary], language_code: Option<&str>) -> String {
    if items.is_empty() {
        return t_lang("list-empty", language_code);
    }

    let mut result = t_lang("list-title", language_code);

    for item in items {
        let date = item.start_date.format("%Y-%m-%d").to_string();
        result.push('\n');
        result.push_str(&t_args_lang(
            "list-item",
            &[("name", item.name.as_str()), ("date", date.as_str())],
            language_code,
        ));
    }

    result
}
