use std::{
    io::{self, BufRead, BufReader, Write},
    net::TcpStream,
};

use tracing::debug;

use crate::{
    disk::BackingStore,
    fs::engine::StorageEngine,
    protocol::{parse_command, Command, Reply},
};

/// 一条请求的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub reply: Reply,
    pub close: bool,
}

impl Outcome {
    fn reply(reply: Reply) -> Self {
        Self {
            reply,
            close: false,
        }
    }
}

/// 把一行请求翻译成一次引擎调用，再格式化成一行应答。
/// 所有错误都在这里变成 `ERROR:` 应答，不会中断连接。
pub fn dispatch<D: BackingStore>(engine: &StorageEngine<D>, line: &str) -> Outcome {
    let cmd = match parse_command(line) {
        Ok(cmd) => cmd,
        Err(e) => {
            debug!(kind = ?e.kind(), error = %e, "rejected request");
            return Outcome::reply(e.into());
        }
    };

    let reply = match cmd {
        Command::Create(name) => match engine.create_file(&name) {
            Ok(()) => Reply::success(format!("File '{name}' created.")),
            Err(e) => e.into(),
        },
        Command::Write(name, content) => match engine.write_file(&name, content.as_bytes()) {
            Ok(()) => Reply::success(format!(
                "Written {} bytes to '{name}'.",
                content.len()
            )),
            Err(e) => e.into(),
        },
        Command::Read(name) => match engine.read_file(&name) {
            Ok(bytes) => Reply::success(format!(
                "Content of '{name}': {}",
                String::from_utf8_lossy(&bytes)
            )),
            Err(e) => e.into(),
        },
        Command::Delete(name) => match engine.delete_file(&name) {
            Ok(()) => Reply::success(format!("File '{name}' deleted.")),
            Err(e) => e.into(),
        },
        Command::List => {
            let files = engine.list_files();
            if files.is_empty() {
                Reply::success("No files on server.")
            } else {
                Reply::success(format!("Files on server: {}", files.join(", ")))
            }
        }
        Command::Quit => {
            return Outcome {
                reply: Reply::success("Disconnecting."),
                close: true,
            }
        }
    };
    Outcome::reply(reply)
}

/// 单个连接的读写循环，直到客户端断开或发送 QUIT
pub fn handle_client<D: BackingStore>(stream: TcpStream, engine: &StorageEngine<D>) -> io::Result<()> {
    let mut writer = stream.try_clone()?;
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break; // EOF
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\r', '\n']);
        debug!(request = line, "received");

        let outcome = dispatch(engine, line);
        writeln!(writer, "{}", outcome.reply)?;
        writer.flush()?;

        if outcome.close {
            break;
        }
    }
    Ok(())
}
