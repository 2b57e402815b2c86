//! proconq-chat — interactive demo client.
//!
//!   proconq-chat [host:port]
//!
//! Commands: login <name> <password>, register <name> <password>, getid,
//! users, send <id> <text>, buffer, database, deluser <name>, quit.

use std::io::{self, BufRead, Write};

use proconq_client::ChatConnection;
use proconq_protocol::{InnerMessage, MessageCode};

const DEFAULT_ADDR: &str = "127.0.0.1:50000";

#[tokio::main]
async fn main() {
    if std::env::var("RUST_LOG").is_err() {
        // SAFETY: single-threaded at this point, no other threads reading env
        unsafe { std::env::set_var("RUST_LOG", "proconq_client=info"); }
    }
    env_logger::init();

    if let Err(e) = run().await {
        eprintln!("\n✗ {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let addr = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_ADDR.to_string());

    println!("Connecting to {addr} …");
    let mut conn = ChatConnection::connect(&addr).await?;
    println!("✓ Handshake complete\n");

    loop {
        let line = prompt("> ")?;
        let mut parts = line.trim().splitn(2, ' ');
        let command = parts.next().unwrap_or("").to_lowercase();
        let rest = parts.next().unwrap_or("");

        let request = match command.as_str() {
            "" => continue,
            "quit" | "exit" => break,
            "login" => {
                let Some((name, password)) = rest.split_once(' ') else {
                    println!("usage: login <name> <password>");
                    continue;
                };
                InnerMessage::with_body(MessageCode::Login, format!("{name}#{password}"))
            }
            "register" => {
                let Some((name, password)) = rest.split_once(' ') else {
                    println!("usage: register <name> <password>");
                    continue;
                };
                InnerMessage::with_body(MessageCode::Regstr, format!("{name}#{password}"))
            }
            "getid" => InnerMessage::bare(MessageCode::Getid),
            "users" => InnerMessage::bare(MessageCode::Users),
            "send" => {
                let Some((dst, text)) = rest.split_once(' ') else {
                    println!("usage: send <id> <text>");
                    continue;
                };
                InnerMessage::with_body(MessageCode::Sndmsg, format!("{dst} {text}"))
            }
            "buffer" => InnerMessage::bare(MessageCode::Buffer),
            "database" => InnerMessage::bare(MessageCode::Database),
            "deluser" => {
                if rest.is_empty() {
                    println!("usage: deluser <name>");
                    continue;
                }
                InnerMessage::with_body(MessageCode::Deluser, rest.to_string())
            }
            other => {
                println!("unknown command: {other}");
                continue;
            }
        };

        conn.send(request).await?;
        match conn.recv().await? {
            Some(reply) => print_reply(&reply),
            None => {
                println!("server closed the connection");
                break;
            }
        }
    }

    Ok(())
}

fn print_reply(msg: &InnerMessage) {
    match msg.body.as_deref() {
        Some(body) => println!("< {} {}", msg.code, body),
        None => println!("< {}", msg.code),
    }
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}
