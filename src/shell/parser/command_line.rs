use indexmap::IndexMap;

/// One pipeline stage: the program name followed by its arguments.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Command {
    args: Vec<String>,
}

impl Command {
    pub(crate) fn push_arg(&mut self, arg: String) {
        self.args.push(arg);
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// The executable name. A finalized [`CommandLine`] never contains an
    /// empty stage, so index 0 always exists.
    pub fn program(&self) -> &str {
        &self.args[0]
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// The parse result of one command line: the pipeline stages in order, the
/// optional redirect targets for the ends of the pipeline, and the
/// environment overrides scoped to this line.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CommandLine {
    commands: Vec<Command>,
    stdin_redirect: Option<String>,
    stdout_redirect: Option<String>,
    env_overrides: IndexMap<String, String>,
}

impl CommandLine {
    pub(crate) fn push_command(&mut self, command: Command) {
        self.commands.push(command);
    }

    // last redirect of a direction wins
    pub(crate) fn set_stdin_redirect(&mut self, target: String) {
        self.stdin_redirect = Some(target);
    }

    pub(crate) fn set_stdout_redirect(&mut self, target: String) {
        self.stdout_redirect = Some(target);
    }

    pub(crate) fn insert_env_override(&mut self, name: String, value: String) {
        self.env_overrides.insert(name, value);
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Applies to the first stage only.
    pub fn stdin_redirect(&self) -> Option<&str> {
        self.stdin_redirect.as_deref()
    }

    /// Applies to the last stage only.
    pub fn stdout_redirect(&self) -> Option<&str> {
        self.stdout_redirect.as_deref()
    }

    pub fn env_overrides(&self) -> &IndexMap<String, String> {
        &self.env_overrides
    }
}
