use colored::*;

use crate::protocol::Reply;

pub const COMMANDS: [&str; 8] = [
    "create", "write", "read", "delete", "list", "help", "quit", "exit",
];

pub fn render_reply(reply: &Reply) -> String {
    match reply {
        Reply::Success(msg) => format!("{} {}", "✅".green(), msg.green()),
        Reply::Error(msg) => format!("{} {}", "❌ Error:".red().bold(), msg),
    }
}

pub fn print_reply(reply: &Reply) {
    println!("{}", render_reply(reply));
}

pub fn print_help() {
    println!("{}", "📘 MiniFS Commands".bright_cyan().bold());
    println!(
        "{}",
        "
  create <file>          Create an empty file
  write <file> <text>    Replace file content with text
  read <file>            Show file content
  delete <file>          Delete file and free its blocks
  list                   List files on the server
  help                   Show this help message
  quit | exit            Close the connection
"
        .bright_black()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_keeps_message() {
        colored::control::set_override(false);
        assert_eq!(
            render_reply(&Reply::success("File 'a' created.")),
            "✅ File 'a' created."
        );
        assert_eq!(
            render_reply(&Reply::error("file a does not exist")),
            "❌ Error: file a does not exist"
        );
    }
}
