use anyhow::Result;
use inquire::Text;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};
use std::io::{self, IsTerminal, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::command::SlashCommandCompleter;
use super::registry::{Context, Outcome, Registry, Services};
use super::state::SessionState;
use super::ui;
use crate::completion::CompletionClient;
use crate::config::ResolvedConfig;
use crate::search::SearchClient;
use crate::ui::is_prompt_cancelled;

/// An interactive assistant session.
///
/// Owns the session state and lends it to one command at a time; lines are
/// handled strictly in the order they are read.
pub struct ChatSession {
    state: SessionState,
    services: Services,
    registry: Registry,
    out: Box<dyn Write + Send>,
    interactive: bool,
}

impl ChatSession {
    /// Creates a session writing to stdout.
    pub fn new(config: ResolvedConfig) -> Self {
        let interactive = io::stdin().is_terminal() && io::stdout().is_terminal();
        Self::with_output(config, Box::new(io::stdout()), interactive)
    }

    pub fn with_output(
        config: ResolvedConfig,
        out: Box<dyn Write + Send>,
        interactive: bool,
    ) -> Self {
        let services = Services {
            completion: CompletionClient::new(config.endpoint, config.api_key),
            search: SearchClient::new(config.search_endpoint),
        };
        Self {
            state: SessionState::new(config.system_prompt, config.model, config.diff_enabled),
            services,
            registry: Registry::with_builtins(),
            out,
            interactive,
        }
    }

    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Handles one input line.
    pub async fn dispatch(&mut self, line: &str) -> Result<Outcome> {
        let mut ctx = Context {
            state: &mut self.state,
            services: &self.services,
            out: &mut *self.out,
            interactive: self.interactive,
        };
        let outcome = self.registry.dispatch(line, &mut ctx).await;
        self.out.flush()?;
        outcome
    }

    pub async fn run(&mut self) -> Result<()> {
        ui::print_header(&mut *self.out, self.state.active_model())?;

        let ended_by_command = if io::stdin().is_terminal() {
            self.run_prompt().await?
        } else {
            self.run_piped().await?
        };

        if !ended_by_command {
            ui::print_goodbye(&mut *self.out)?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Reads lines from an interactive prompt. Returns `true` if `/exit` ended it.
    async fn run_prompt(&mut self) -> Result<bool> {
        let prompt_style = Styled::new("❯")
            .with_fg(Color::LightBlue)
            .with_attr(Attributes::BOLD);
        let mut render_config = RenderConfig::default()
            .with_prompt_prefix(prompt_style)
            .with_answered_prompt_prefix(prompt_style);

        // Non-highlighted suggestions: gray
        render_config.option = StyleSheet::new().with_fg(Color::Grey);
        // Highlighted suggestion: purple
        render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkMagenta));

        loop {
            let input = Text::new("")
                .with_render_config(render_config)
                .with_autocomplete(SlashCommandCompleter)
                .with_help_message("Type a message, /help for commands, Ctrl+C to quit")
                .prompt();

            match input {
                Ok(line) => {
                    if self.dispatch(&line).await? == Outcome::Exit {
                        return Ok(true);
                    }
                }
                Err(e) if is_prompt_cancelled(&e) => {
                    writeln!(self.out)?;
                    return Ok(false);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Reads lines from piped stdin until EOF. Returns `true` if `/exit` ended it.
    async fn run_piped(&mut self) -> Result<bool> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines.next_line().await? {
            if self.dispatch(&line).await? == Outcome::Exit {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::chat::state::{ChatMessage, Role};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// A clonable in-memory writer so tests can read what the session printed.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn take(&self) -> String {
            String::from_utf8(std::mem::take(&mut *self.0.lock().unwrap())).unwrap()
        }
    }

    fn config(endpoint: String) -> ResolvedConfig {
        ResolvedConfig {
            model: "test/model".to_string(),
            endpoint,
            search_endpoint: "http://127.0.0.1:9/".to_string(),
            api_key: None,
            system_prompt: "You are terse.".to_string(),
            diff_enabled: true,
        }
    }

    fn session(endpoint: String) -> (ChatSession, SharedBuf) {
        let buf = SharedBuf::default();
        let session = ChatSession::with_output(config(endpoint), Box::new(buf.clone()), false);
        (session, buf)
    }

    #[tokio::test]
    async fn test_session_starts_with_system_prompt() {
        let (session, _) = session("http://127.0.0.1:9/".to_string());
        assert_eq!(
            session.state().transcript(),
            &[ChatMessage::new(Role::System, "You are terse.")]
        );
    }

    #[tokio::test]
    async fn test_chat_line_then_commands() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "data: {\"choices\":[{\"delta\":{\"content\":\"Hi!\"}}]}\n\ndata: [DONE]\n\n",
                "text/event-stream",
            ))
            .mount(&server)
            .await;
        let (mut session, buf) = session(server.uri());

        assert_eq!(
            session.dispatch("  /unknown hello  ").await.unwrap(),
            Outcome::Continue
        );
        assert_eq!(buf.take().trim_end(), "Hi!");

        let transcript = session.state().transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(
            transcript[transcript.len() - 2],
            ChatMessage::new(Role::User, "/unknown hello")
        );

        session.dispatch("/model").await.unwrap();
        assert!(buf.take().contains("test/model"));

        assert_eq!(session.dispatch("/exit").await.unwrap(), Outcome::Exit);
        assert!(buf.take().contains("Goodbye!"));
    }

    #[tokio::test]
    async fn test_edit_undo_through_session() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("main.py");
        let (mut session, buf) = session("http://127.0.0.1:9/".to_string());

        session
            .dispatch(&format!("/new {}", file.display()))
            .await
            .unwrap();
        let created = std::fs::read_to_string(&file).unwrap();
        assert!(created.starts_with("def main():"));

        session
            .dispatch(&format!("/edit {}", file.display()))
            .await
            .unwrap();
        std::fs::write(&file, "print('changed')\n").unwrap();
        session
            .dispatch(&format!("/undo {}", file.display()))
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&file).unwrap(), created);
        let out = buf.take();
        assert!(out.contains("Undone changes"));
        assert!(out.contains("changed"));
    }
}
