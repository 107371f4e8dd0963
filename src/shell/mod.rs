pub mod client;
pub mod render;

use std::{io::stdout, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use colored::*;
use crossterm::{
    cursor, execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use reedline::{
    default_emacs_keybindings, ColumnarMenu, DefaultCompleter, DefaultPrompt,
    DefaultPromptSegment, Emacs, FileBackedHistory, KeyCode, KeyModifiers, MenuBuilder,
    Reedline, ReedlineEvent, ReedlineMenu, Signal,
};

use crate::shell::{
    client::Connection,
    render::{print_help, print_reply, COMMANDS},
};

/// MiniFS interactive client
#[derive(Debug, Clone, Parser)]
#[command(name = "minifs-client", version)]
pub struct ClientArgs {
    /// Server host
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Server port
    #[arg(short, long, default_value_t = 12345)]
    pub port: u16,
}

pub fn start_shell(args: &ClientArgs) -> anyhow::Result<()> {
    banner()?;

    let addr = format!("{}:{}", args.host, args.port);
    let mut conn =
        Connection::connect(&addr).with_context(|| format!("could not connect to {addr}"))?;
    println!("{} {}", "🔌 Connected to".green(), addr.cyan());
    println!(
        "{}",
        "Type 'help' for available commands. Use ↑↓ for history, Tab for auto-completion.\n"
            .bright_black()
    );

    let username = whoami::username();
    let hostname = whoami::fallible::hostname().unwrap_or_else(|_| "localhost".into());

    // 历史记录保存在用户目录
    let history_path = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".minifs_history");
    let history = FileBackedHistory::with_file(100, history_path)
        .context("could not open history file")?;

    // 命令补全
    let completer = DefaultCompleter::new_with_wordlen(
        COMMANDS.iter().map(|c| c.to_string()).collect(),
        2,
    );
    let completion_menu = ColumnarMenu::default().with_name("completion_menu");
    let mut keybindings = default_emacs_keybindings();
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu("completion_menu".to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );

    let mut line_editor = Reedline::create()
        .with_history(Box::new(history))
        .with_completer(Box::new(completer))
        .with_menu(ReedlineMenu::EngineCompleter(Box::new(completion_menu)))
        .with_edit_mode(Box::new(Emacs::new(keybindings)));

    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic(format!("{username}@{hostname}")),
        DefaultPromptSegment::Basic("MiniFS".to_string()),
    );

    loop {
        match line_editor.read_line(&prompt)? {
            Signal::Success(buffer) => {
                let trimmed = buffer.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed.eq_ignore_ascii_case("help") {
                    print_help();
                    continue;
                }

                let quitting =
                    trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit");
                let request = if quitting { "QUIT" } else { trimmed };

                match conn.request(request)? {
                    Some(reply) => print_reply(&reply),
                    None => {
                        println!("{}", "⚠️  Server closed the connection.".yellow());
                        break;
                    }
                }
                if quitting {
                    break;
                }
            }
            Signal::CtrlC => {
                println!();
                continue;
            }
            Signal::CtrlD => {
                if let Some(reply) = conn.request("QUIT")? {
                    print_reply(&reply);
                }
                break;
            }
            #[allow(unreachable_patterns)]
            _ => continue,
        }
    }

    println!("{}", "👋 Bye!".bright_yellow());
    Ok(())
}

fn banner() -> anyhow::Result<()> {
    let mut stdout = stdout();
    execute!(
        stdout,
        Clear(ClearType::All),
        cursor::MoveTo(0, 0),
        SetForegroundColor(Color::Cyan),
        Print(format!("Welcome to MiniFS v{}\n", env!("CARGO_PKG_VERSION"))),
        ResetColor
    )?;
    Ok(())
}
