use std::{
    io::{self, BufRead, BufReader, Write},
    net::{TcpStream, ToSocketAddrs},
};

use crate::protocol::Reply;

/// 到文件服务器的一条连接：发一行请求，收一行应答
pub struct Connection {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl Connection {
    pub fn connect(addr: impl ToSocketAddrs) -> io::Result<Self> {
        let stream = TcpStream::connect(addr)?;
        let writer = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(stream),
            writer,
        })
    }

    /// 发送一条请求；服务器已关闭连接时返回 `None`
    pub fn request(&mut self, line: &str) -> io::Result<Option<Reply>> {
        writeln!(self.writer, "{}", line.trim_end_matches(['\r', '\n']))?;
        self.writer.flush()?;

        let mut response = String::new();
        if self.reader.read_line(&mut response)? == 0 {
            return Ok(None);
        }
        Ok(Some(Reply::parse(&response)))
    }
}
