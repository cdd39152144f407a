//! Interactive REPL for the research chat
//!
//! Readline-based loop: plain input becomes a research request, slash
//! commands drive the controls (depth selector, history panel, backend
//! override, clear). The loop blocks on one request at a time, so a
//! submission cannot interleave with an in-flight one.

pub mod colors;
mod helper;

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::time::Instant;

use crate::classify::{is_follow_up, DepthChoice};
use crate::client::{BriefClient, BriefRequest};
use crate::render::render_brief;
use crate::session::{RequestState, SessionState};

use helper::BriefHelper;

/// How many history entries the /history panel shows
const HISTORY_PANEL_ENTRIES: usize = 5;
/// Queries in the panel are clipped to this many chars
const HISTORY_QUERY_CHARS: usize = 50;

/// REPL state
pub struct Repl {
    /// Readline editor with history and completion
    editor: Editor<BriefHelper, DefaultHistory>,
    /// Backend client
    client: BriefClient,
    /// Session-scoped conversation state
    session: SessionState,
    /// Depth selector (/depth), Auto delegates to the classifier
    depth_choice: DepthChoice,
    /// Result of the last health probe, shown in /status
    connected: bool,
    /// History file path
    history_path: std::path::PathBuf,
    /// When this REPL instance started (used for /uptime)
    start_time: Instant,
}

impl Repl {
    pub fn new(client: BriefClient, depth_choice: DepthChoice, connected: bool) -> Result<Self> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(BriefHelper::new()));

        let history_path = dirs::home_dir()
            .unwrap_or_default()
            .join(".brief")
            .join("chat_history");

        Ok(Self {
            editor,
            client,
            session: SessionState::new(),
            depth_choice,
            connected,
            history_path,
            start_time: Instant::now(),
        })
    }

    /// Opaque session identifier sent with every request
    pub fn user_id(&self) -> &str {
        self.session.user_id()
    }

    /// Backend base URL currently in use
    pub fn backend_url(&self) -> &str {
        self.client.base_url()
    }

    fn load_history(&mut self) {
        if self.history_path.exists() {
            let _ = self.editor.load_history(&self.history_path);
        }
    }

    fn save_history(&mut self) {
        if let Some(parent) = self.history_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = self.editor.save_history(&self.history_path);
    }

    /// Run the REPL loop
    pub async fn run(&mut self) -> Result<()> {
        self.load_history();

        if self.session.messages().is_empty() {
            print_greeting();
        }

        println!("Type a research question (Ctrl+D to exit, /help for commands)");
        println!("  Use \\ at end of line for multi-line input");
        println!();

        loop {
            let input = self.read_input()?;

            match input {
                Some(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    self.editor.add_history_entry(&line)?;

                    if trimmed.starts_with('/') {
                        self.handle_command(trimmed).await?;
                        continue;
                    }

                    self.process_input(trimmed).await?;
                }
                None => {
                    println!("Goodbye!");
                    break;
                }
            }
        }

        self.save_history();
        Ok(())
    }

    /// Read input with backslash continuation support
    fn read_input(&mut self) -> Result<Option<String>> {
        let first_line = match self.editor.readline(">>> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                return Ok(Some(String::new()));
            }
            Err(ReadlineError::Eof) => return Ok(None),
            Err(err) => {
                eprintln!("Error: {:?}", err);
                return Ok(None);
            }
        };

        if !first_line.trim().ends_with('\\') {
            return Ok(Some(first_line));
        }

        let mut lines = vec![strip_continuation(&first_line)];
        loop {
            match self.editor.readline("... ") {
                Ok(line) => {
                    if line.trim().ends_with('\\') {
                        lines.push(strip_continuation(&line));
                    } else {
                        lines.push(line);
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C (cancelled multi-line)");
                    return Ok(Some(String::new()));
                }
                Err(ReadlineError::Eof) => return Ok(None),
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    return Ok(None);
                }
            }
        }

        Ok(Some(lines.join("\n")))
    }

    /// Handle slash commands
    async fn handle_command(&mut self, cmd: &str) -> Result<()> {
        let parts: Vec<&str> = cmd.splitn(2, ' ').collect();
        let command = parts[0];
        let arg = parts.get(1).copied().unwrap_or("").trim();

        match command {
            "/help" => {
                println!("Commands:");
                println!("  /help              - Show this help");
                println!("  /version           - Show version info");
                println!("  /uptime            - Show session uptime");
                println!("  /depth [level]     - Show or set research depth (auto/quick/medium/deep)");
                println!("  /backend [url]     - Show or override the backend URL");
                println!("  /history           - Show recent research history");
                println!("  /clear             - Clear the conversation");
                println!("  /status            - Show current state");
                println!("  /quit              - Exit");
            }
            "/version" => {
                println!("brief-chat v{}", env!("CARGO_PKG_VERSION"));
                println!("  Backend: {}", self.client.base_url());
            }
            "/uptime" => {
                println!("Uptime: {}", format_duration(self.start_time.elapsed()));
            }
            "/depth" => {
                if arg.is_empty() {
                    println!("Depth: {}", self.depth_choice.as_str());
                    println!("  auto   - detect from the message");
                    println!("  quick  - fast overview");
                    println!("  medium - balanced analysis");
                    println!("  deep   - comprehensive research");
                } else {
                    match DepthChoice::parse(arg) {
                        Some(choice) => {
                            self.depth_choice = choice;
                            println!("Depth set to {}.", choice.as_str());
                        }
                        None => println!("Unknown depth: {}. Use auto, quick, medium, or deep.", arg),
                    }
                }
            }
            "/backend" => {
                self.cmd_backend(arg).await;
            }
            "/history" => {
                self.cmd_history();
            }
            "/clear" => {
                self.session.clear();
                println!("Conversation cleared.");
            }
            "/status" => {
                self.cmd_status();
            }
            "/quit" | "/exit" => {
                self.save_history();
                std::process::exit(0);
            }
            _ => {
                println!("Unknown command: {}. Try /help", command);
            }
        }
        Ok(())
    }

    /// /backend - show or override the backend URL, re-probing health
    async fn cmd_backend(&mut self, url: &str) {
        if url.is_empty() {
            println!("Backend: {}", self.client.base_url());
            println!(
                "Status: {}",
                if self.connected {
                    colors::success("connected")
                } else {
                    colors::warning("unreachable")
                }
            );
            return;
        }

        self.client.set_base_url(url);
        self.connected = self.client.health().await;
        if self.connected {
            println!(
                "{}",
                colors::success(&format!("Connected to {}", self.client.base_url()))
            );
        } else {
            println!(
                "{}",
                colors::warning(&format!(
                    "Cannot reach {}. Requests will still be attempted.",
                    self.client.base_url()
                ))
            );
        }
    }

    /// /history - recent research entries, newest first
    fn cmd_history(&self) {
        let recent = self.session.recent_history(HISTORY_PANEL_ENTRIES);
        if recent.is_empty() {
            println!("No research history yet.");
            return;
        }

        println!("Research history ({} shown):", recent.len());
        for entry in recent {
            let icon = if entry.is_follow_up { "↪" } else { "+" };
            let query = crate::session::truncate_with_ellipsis(&entry.query, HISTORY_QUERY_CHARS);
            println!("  {} {}", icon, query);
        }
    }

    /// /status - current session state
    fn cmd_status(&self) {
        println!("Backend: {}", self.client.base_url());
        println!(
            "Connected: {}",
            if self.connected { "yes" } else { "no" }
        );
        println!("Depth: {}", self.depth_choice.as_str());
        println!("Messages: {}", self.session.messages().len());
        println!("History entries: {}", self.session.history().len());
        println!("Last request: {}", self.session.request_state().as_str());
        println!("Session id: {}", self.session.user_id());
    }

    /// Process one research submission end to end.
    ///
    /// Request failures surface as a visible error plus a plain assistant
    /// message; nothing propagates past this boundary.
    async fn process_input(&mut self, input: &str) -> Result<()> {
        let depth = self.depth_choice.resolve(input);
        let follow_up = is_follow_up(input, self.session.history().len());

        self.session.push_user_message(input);

        let request = BriefRequest {
            topic: input.to_string(),
            depth: depth.as_int(),
            follow_up,
            user_id: self.session.user_id().to_string(),
            conversation_history: self.session.context_for_request(),
        };

        println!("  {}", colors::depth_indicator(depth.label(), follow_up));
        println!(
            "  {}",
            colors::status("researching... this may take a while")
        );

        self.session.set_request_state(RequestState::Pending);

        match self.client.create_brief(&request).await {
            Ok(brief) => {
                let ack = format!(
                    "Completed a {} research analysis{}.",
                    depth.label(),
                    if follow_up { " (follow-up detected)" } else { "" }
                );
                self.session.record_exchange(input, &brief, follow_up, depth);
                self.session
                    .push_assistant_message(&ack, Some(brief.clone()));
                self.session.set_request_state(RequestState::Complete);

                println!("{}", colors::success(&ack));
                println!("{}", render_brief(&brief));
            }
            Err(e) => {
                tracing::warn!("brief request failed: {}", e);
                let message = format!(
                    "I encountered an error while researching your query. Please try again. ({})",
                    e
                );
                self.session.push_assistant_message(&message, None);
                self.session.set_request_state(RequestState::Failed);

                eprintln!("{}", colors::error(&message));
            }
        }

        Ok(())
    }
}

fn strip_continuation(line: &str) -> String {
    let trimmed = line.trim();
    trimmed
        .strip_suffix('\\')
        .map(str::trim_end)
        .unwrap_or(trimmed)
        .to_string()
}

fn format_duration(d: std::time::Duration) -> String {
    let mut secs = d.as_secs();

    let hours = secs / 3_600;
    secs %= 3_600;
    let mins = secs / 60;
    secs %= 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}

fn print_greeting() {
    println!("Hello! I'm your research assistant. Ask me anything:");
    println!("  - structured briefs with findings and sources");
    println!("  - follow-ups that build on the conversation");
    println!("  - say 'quick' for an overview, 'detailed' for a deep dive");
    println!();
    println!("Try: \"Research the impact of AI on healthcare\"");
    println!();
}
