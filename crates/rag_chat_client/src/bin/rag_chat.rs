//! rag-chat: terminal front end for the answer endpoint.
//! Reads config, then answers one question per stdin line until EOF.

use clap::Parser;
use rag_chat_client::{config, logging, AnswerClient, ChatSession};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use tracing::{debug, error};

#[derive(Debug, Parser)]
#[command(name = "rag-chat", about = "Ask the configured answer endpoint from the terminal")]
struct Args {
    /// Config file (default: ~/.rag-chat/config.yaml)
    #[arg(long, env = "RAG_CHAT_CONFIG")]
    config: Option<PathBuf>,
}

enum Input<'a> {
    Question(&'a str),
    NewChat,
    List,
    Switch(&'a str),
    Prompts,
    Quit,
    Skip,
}

fn parse_line(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Input::Skip;
    }
    let mut parts = line.splitn(2, char::is_whitespace);
    match parts.next().unwrap_or_default() {
        "/new" => Input::NewChat,
        "/list" => Input::List,
        "/switch" => Input::Switch(parts.next().unwrap_or_default().trim()),
        "/prompts" => Input::Prompts,
        "/quit" => Input::Quit,
        _ => Input::Question(line),
    }
}

fn print_list(out: &mut impl Write, session: &ChatSession) {
    let view = session.snapshot();
    for group in &view.groups {
        let _ = writeln!(out, "{}", group.label);
        for c in &group.conversations {
            let marker = if c.active { '*' } else { ' ' };
            let _ = writeln!(out, " {} {} {}", marker, c.id, c.title);
        }
    }
}

fn main() {
    logging::init_tracing("warn");
    let args = Args::parse();

    let config_path = args
        .config
        .or_else(config::default_config_path)
        .unwrap_or_else(|| {
            eprintln!("Error: unable to determine config path (set --config or RAG_CHAT_CONFIG)");
            process::exit(1);
        });

    let cfg = config::load(&config_path).unwrap_or_else(|e| {
        eprintln!(
            "Error: failed to load config from {}: {}",
            config_path.display(),
            e
        );
        process::exit(1);
    });
    let endpoint = cfg.endpoint().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });
    debug!(url = %endpoint.url, "endpoint configured");

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Error: failed to create runtime: {}", e);
            process::exit(1);
        });

    let client = AnswerClient::new(endpoint);
    let mut session = ChatSession::new();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!(error = %e, "failed to read stdin");
                break;
            }
        };
        match parse_line(&line) {
            Input::Skip => {}
            Input::Quit => break,
            Input::NewChat => {
                let id = session.new_chat();
                let _ = writeln!(out, "Started conversation {}", id);
            }
            Input::List => print_list(&mut out, &session),
            Input::Switch(arg) => match arg.parse() {
                Ok(id) => {
                    session.select(id);
                    if session.store.active().is_none() {
                        eprintln!("Error: no conversation with id {}", id);
                    }
                }
                Err(_) => eprintln!("Error: /switch expects a conversation id"),
            },
            Input::Prompts => {
                for prompt in cfg.suggested_prompts() {
                    let _ = writeln!(out, "  {}", prompt);
                }
            }
            Input::Question(question) => {
                let Some(reply) = rt.block_on(session.ask_and_record(&client, question)) else {
                    eprintln!("Error: no active conversation (use /new or /switch)");
                    continue;
                };
                match session.error() {
                    Some(message) => {
                        eprintln!("Error: {}", message);
                        session.dismiss_error();
                    }
                    None => {
                        let _ = writeln!(out, "{}", reply);
                    }
                }
                let _ = out.flush();
            }
        }
    }
}
