use std::{
    io::{BufRead, BufReader, Write},
    net::{SocketAddr, TcpStream},
    sync::Arc,
    thread,
};

use minifs::{protocol::Reply, shell::client::Connection, FileServer, FsConfig, MemDisk, StorageEngine};

fn start_server() -> SocketAddr {
    let config = FsConfig::default().block_size(128).max_files(5).max_blocks(10);
    let engine = Arc::new(StorageEngine::open(config, MemDisk::new()).unwrap());
    let server = FileServer::bind("127.0.0.1:0", engine).unwrap();
    let addr = server.local_addr().unwrap();
    thread::spawn(move || server.run());
    addr
}

fn success(reply: Option<Reply>) -> String {
    match reply {
        Some(Reply::Success(msg)) => msg,
        other => panic!("expected success, got {other:?}"),
    }
}

#[test]
fn test_end_to_end_over_tcp() {
    let addr = start_server();
    let mut conn = Connection::connect(addr).unwrap();

    assert_eq!(
        success(conn.request("CREATE a.txt").unwrap()),
        "File 'a.txt' created."
    );
    assert_eq!(
        success(conn.request("WRITE a.txt hello").unwrap()),
        "Written 5 bytes to 'a.txt'."
    );
    assert_eq!(
        success(conn.request("READ a.txt").unwrap()),
        "Content of 'a.txt': hello"
    );
    assert_eq!(
        success(conn.request("LIST").unwrap()),
        "Files on server: a.txt"
    );
    assert_eq!(
        success(conn.request("DELETE a.txt").unwrap()),
        "File 'a.txt' deleted."
    );
    assert_eq!(
        conn.request("READ a.txt").unwrap(),
        Some(Reply::Error("file a.txt does not exist".into()))
    );
    assert_eq!(success(conn.request("QUIT").unwrap()), "Disconnecting.");
    // 服务器在 QUIT 之后关闭连接
    assert_eq!(conn.request("LIST").ok().flatten(), None);
}

#[test]
fn test_write_content_keeps_spaces() {
    let addr = start_server();
    let mut conn = Connection::connect(addr).unwrap();
    conn.request("create notes").unwrap();
    assert_eq!(
        success(conn.request("write notes two  words and\ttab").unwrap()),
        "Written 18 bytes to 'notes'."
    );
    assert_eq!(
        success(conn.request("read notes").unwrap()),
        "Content of 'notes': two  words and\ttab"
    );
}

#[test]
fn test_bad_input_does_not_affect_other_clients() {
    let addr = start_server();
    let mut bad = Connection::connect(addr).unwrap();
    let mut good = Connection::connect(addr).unwrap();

    for line in ["", "FROB", "WRITE x", "CREATE waytoolongname"] {
        let reply = bad.request(line).unwrap().unwrap();
        assert!(!reply.is_success(), "{line}");
    }

    good.request("CREATE ok").unwrap();
    assert_eq!(success(good.request("LIST").unwrap()), "Files on server: ok");
    // 出错的连接仍然可用
    assert_eq!(success(bad.request("LIST").unwrap()), "Files on server: ok");
}

#[test]
fn test_every_reply_is_one_prefixed_line() {
    let addr = start_server();
    let stream = TcpStream::connect(addr).unwrap();
    let mut writer = stream.try_clone().unwrap();
    let mut reader = BufReader::new(stream);

    let requests = ["CREATE a", "CREATE b", "LIST", "nonsense", "READ a", "EXIT"];
    for request in requests {
        writeln!(writer, "{request}\r").unwrap();
    }
    writer.flush().unwrap();

    let mut replies = Vec::new();
    let mut line = String::new();
    while reader.read_line(&mut line).unwrap() > 0 {
        replies.push(line.trim_end().to_string());
        line.clear();
    }

    assert_eq!(replies.len(), requests.len());
    for reply in &replies {
        assert!(reply.starts_with("SUCCESS: ") || reply.starts_with("ERROR: "));
    }
    assert_eq!(replies[2], "SUCCESS: Files on server: a, b");
    assert_eq!(replies[3], "ERROR: Unknown command 'NONSENSE'");
    assert_eq!(replies[4], "SUCCESS: Content of 'a':");
}
