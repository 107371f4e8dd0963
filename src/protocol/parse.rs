use thiserror::Error;

use crate::fs::error::ErrorKind;

/// 一条客户端请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create(String),
    Write(String, String),
    Read(String),
    Delete(String),
    List,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("{0}")]
    MalformedCommand(String),
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),
}

impl ProtocolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedCommand(_) => ErrorKind::MalformedCommand,
            Self::UnknownCommand(_) => ErrorKind::UnknownCommand,
        }
    }
}

// 取出第一个空白分隔的词，返回 (词, 剩余部分)；剩余部分去掉了前导空白
fn next_token(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(pos) => (&input[..pos], input[pos..].trim_start()),
        None => (input, ""),
    }
}

fn filename<'a>(rest: &'a str, cmd: &str) -> Result<&'a str, ProtocolError> {
    let (name, _) = next_token(rest);
    if name.is_empty() {
        return Err(ProtocolError::MalformedCommand(format!(
            "{cmd} command requires filename"
        )));
    }
    Ok(name)
}

/// 解析一行请求。
///
/// 命令关键字大小写不敏感。最多切两刀：`WRITE` 文件名之后的所有内容
/// （包括中间的空白）原样作为写入内容。
pub fn parse_command(line: &str) -> Result<Command, ProtocolError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ProtocolError::MalformedCommand("empty command".into()));
    }

    let (cmd, rest) = next_token(line);
    let cmd = cmd.to_ascii_uppercase();

    match cmd.as_str() {
        "CREATE" => filename(rest, &cmd).map(|n| Command::Create(n.to_string())),
        "READ" => filename(rest, &cmd).map(|n| Command::Read(n.to_string())),
        "DELETE" => filename(rest, &cmd).map(|n| Command::Delete(n.to_string())),
        "WRITE" => {
            let (name, content) = next_token(rest);
            if name.is_empty() || content.is_empty() {
                return Err(ProtocolError::MalformedCommand(
                    "WRITE command requires filename and content".into(),
                ));
            }
            Ok(Command::Write(name.to_string(), content.to_string()))
        }
        "LIST" => Ok(Command::List),
        "QUIT" | "EXIT" => Ok(Command::Quit),
        _ => Err(ProtocolError::UnknownCommand(cmd)),
    }
}
