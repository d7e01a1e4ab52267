use inquire::autocompletion::{Autocomplete, Replacement};

/// Slash commands: (command, description)
pub const COMMANDS: &[(&str, &str)] = &[
    ("/help", "Show this help message"),
    ("/exit", "Exit the application"),
    ("/clear", "Clear the screen"),
    ("/show", "Show content of a file"),
    ("/new", "Create a new file from a template"),
    ("/add", "Add files to the assistant's context"),
    ("/edit", "Snapshot a file before editing it"),
    ("/diff", "Toggle display of diffs"),
    ("/history", "View chat history"),
    ("/save", "Save chat history to a file"),
    ("/load", "Load chat history from a file"),
    ("/undo", "Undo last edit for a specific file"),
    ("/search", "Perform a DuckDuckGo search"),
    ("/image", "Encode image(s) for the assistant"),
    ("/model", "Show current AI model"),
    ("/change_model", "Change the AI model"),
    ("/reset", "Reset entire chat and file memory"),
];

/// Slash command autocompleter
#[derive(Clone, Default)]
pub struct SlashCommandCompleter;

impl Autocomplete for SlashCommandCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, inquire::CustomUserError> {
        if !input.starts_with('/') || input.contains(char::is_whitespace) {
            return Ok(vec![]);
        }

        let suggestions: Vec<String> = COMMANDS
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(input))
            .map(|(cmd, desc)| format!("{cmd}  {desc}"))
            .collect();

        Ok(suggestions)
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, inquire::CustomUserError> {
        let replacement =
            highlighted_suggestion.map(|s| s.split_whitespace().next().unwrap_or("").to_string());
        Ok(replacement)
    }
}

/// Where an input line goes.
#[derive(Debug, PartialEq, Eq)]
pub enum Route<'a> {
    /// Blank line; nothing happens.
    Empty,
    /// A known command and its whitespace-separated arguments.
    Command { name: &'a str, args: Vec<String> },
    /// Anything else: the whole trimmed line is a chat turn.
    Chat(String),
}

/// Routes a raw line.
///
/// Matching is exact and case-sensitive on the first token. An unknown first
/// token, slash or not, makes the entire line a chat turn.
pub fn route<'a>(line: &'a str, is_known: impl Fn(&str) -> bool) -> Route<'a> {
    let line = line.trim();
    let mut tokens = line.split_whitespace();

    let Some(first) = tokens.next() else {
        return Route::Empty;
    };

    if is_known(first) {
        Route::Command {
            name: first,
            args: tokens.map(str::to_string).collect(),
        }
    } else {
        Route::Chat(line.to_string())
    }
}
