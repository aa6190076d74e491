pub mod parser;
pub mod runner;

use std::env;

use rustyline::{config::BellStyle, error::ReadlineError, Config, DefaultEditor};
use tracing::{debug, trace};

use self::{
    parser::{ParsedLine, Parser},
    runner::exit_status::ExitStatus,
};

pub struct Shell {
    running: bool,
    status: i32,
}

impl Shell {
    pub fn new() -> Self {
        Shell {
            running: true,
            status: 0,
        }
    }

    /// The interactive read-eval loop. Returns the status of the last
    /// pipeline once the input is exhausted.
    pub fn run(&mut self) -> i32 {
        let config = Config::builder().bell_style(BellStyle::None).build();
        let mut editor = match DefaultEditor::with_config(config) {
            Ok(editor) => editor,
            Err(error) => {
                eprintln!("husk: cannot open line editor: {error}");
                return 1;
            }
        };

        while self.running {
            match editor.readline(&self.prompt()) {
                Ok(line) => self.run_line("interactive", line),
                Err(ReadlineError::Interrupted) => println!("^C"),
                Err(ReadlineError::Eof) => self.running = false,
                Err(error) => {
                    eprintln!("husk: {error}");
                    self.status = 1;
                    break;
                }
            }
        }
        self.status
    }

    /// Parses and runs every command line in `src`. Parse and launch errors
    /// abort the rest of the line, never the shell.
    pub fn run_line(&mut self, name: &str, src: String) {
        let mut parser = Parser::new(name.to_string(), src);
        loop {
            match parser.parse_line() {
                Ok(ParsedLine::Pipeline(command_line)) => {
                    trace!(?command_line, "parsed");
                    match runner::run(&command_line, env::vars()) {
                        Ok(statuses) => {
                            // pipeline status follows the last stage
                            self.status = statuses.last().map(ExitStatus::code).unwrap_or(0);
                        }
                        Err(error) => {
                            eprintln!("husk: {error}");
                            self.status = 1;
                        }
                    }
                }
                Ok(ParsedLine::Empty) => (),
                Ok(ParsedLine::Eof) => break,
                Err(error) => {
                    eprintln!("{:?}", miette::Report::new(error));
                    self.status = 1;
                    break;
                }
            }
        }
        debug!(status = self.status, "line finished");
    }

    fn prompt(&self) -> String {
        let dir = env::current_dir()
            .map(|dir| dir.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!(
            "{}@{} {} > ",
            whoami::username().to_ascii_lowercase(),
            whoami::devicename().to_ascii_lowercase(),
            dir
        )
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}
