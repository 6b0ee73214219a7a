use weft_types::Message;

use crate::cli::OutputFormat;
use crate::util::{format_tokens, truncate_text};

pub(crate) fn print_messages(messages: &[Message], format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(messages)?),
        OutputFormat::Table => {
            println!("{:<4} {:<10} {:<28} {:>7}  Text", "#", "Role", "Parts", "Tokens");
            println!("{}", "-".repeat(80));
            for (index, message) in messages.iter().enumerate() {
                println!("{}", table_row(index, message));
            }
        }
    }
    Ok(())
}

fn table_row(index: usize, message: &Message) -> String {
    let kinds: Vec<&str> = message.parts.iter().map(|p| p.kind()).collect();
    let tokens = message
        .usage
        .map(|u| format_tokens(u.total_tokens))
        .unwrap_or_else(|| "-".to_string());
    let text = message.text().replace('\n', " ");
    format!(
        "{:<4} {:<10} {:<28} {:>7}  {}",
        index,
        message.role.to_string(),
        truncate_text(&kinds.join(","), 28),
        tokens,
        truncate_text(&text, 30)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_types::{Part, Role, TokenUsage};

    #[test]
    fn test_table_row() {
        let message = Message::new(
            Role::Assistant,
            vec![Part::reasoning("hm"), Part::text("The answer\nis 42")],
        )
        .with_usage(TokenUsage::new(1_200, 300));

        let row = table_row(3, &message);
        assert!(row.starts_with("3    assistant"));
        assert!(row.contains("reasoning,text"));
        assert!(row.contains("2K"));
        assert!(row.ends_with("The answer is 42"));
    }
}
