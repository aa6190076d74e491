pub mod exit_status;
pub mod run_error;

use std::{
    ffi::CString,
    fs::File,
    os::fd::{AsRawFd, OwnedFd},
};

use indexmap::IndexMap;
use nix::{
    errno::Errno,
    libc,
    sys::wait::waitpid,
    unistd::{self, execvpe, fork, pipe, ForkResult, Pid},
};
use tracing::debug;

use self::{exit_status::ExitStatus, run_error::RunError};
use super::parser::command_line::{Command, CommandLine};

/// Executes a parsed pipeline: one process per stage, adjacent stages
/// connected by a pipe, redirects applied at the two ends, the line's
/// environment overrides layered over the inherited environment for every
/// child. Returns the exit status of every stage in launch order.
pub fn run<I>(command_line: &CommandLine, inherited_env: I) -> Result<Vec<ExitStatus>, RunError>
where
    I: IntoIterator<Item = (String, String)>,
{
    // argv and the environment are converted up front so that a stray nul
    // byte is a launch error before anything has been spawned
    let argvs = command_line
        .commands()
        .iter()
        .map(stage_argv)
        .collect::<Result<Vec<_>, _>>()?;
    let envp = merged_env(inherited_env, command_line.env_overrides())?;

    let stages = command_line.commands().len();
    let mut pipes = Vec::with_capacity(stages.saturating_sub(1));
    for _ in 1..stages {
        pipes.push(pipe().map_err(RunError::Pipe)?);
    }

    debug!(stages, "spawning pipeline");

    let mut children: Vec<Pid> = Vec::with_capacity(stages);
    let mut error = None;
    for (index, argv) in argvs.iter().enumerate() {
        // the shell never spawns threads, so the child side is free to
        // allocate and open files before exec
        match unsafe { fork() } {
            Ok(ForkResult::Child) => {
                let code = exec_stage(command_line, index, argv, &envp, &pipes);
                // only reached when exec failed; the diagnostic is already
                // on stderr and the parent must never be re-entered
                unsafe { libc::_exit(code) }
            }
            Ok(ForkResult::Parent { child }) => {
                debug!(stage = index, pid = child.as_raw(), "forked");
                children.push(child);
            }
            Err(errno) => {
                error = Some(RunError::Fork(errno));
                break;
            }
        }
    }

    // The parent never touches pipe data. Dropping the fds closes both ends
    // of every pipe; a parent-held write end would keep readers from ever
    // seeing end-of-stream.
    drop(pipes);

    // every spawned child is waited for, even when a later fork failed
    let mut statuses = Vec::with_capacity(children.len());
    for child in children {
        match waitpid(child, None) {
            Ok(status) => {
                let status = ExitStatus::from(status);
                debug!(pid = child.as_raw(), %status, "stage finished");
                statuses.push(status);
            }
            Err(errno) => {
                if error.is_none() {
                    error = Some(RunError::Wait(errno));
                }
            }
        }
    }

    match error {
        Some(error) => Err(error),
        None => Ok(statuses),
    }
}

/// Child-side setup between fork and exec. Returns the exit code to die
/// with when something fails; on success `execvpe` never returns.
fn exec_stage(
    command_line: &CommandLine,
    index: usize,
    argv: &[CString],
    envp: &[CString],
    pipes: &[(OwnedFd, OwnedFd)],
) -> i32 {
    let last = command_line.commands().len() - 1;

    if index != last {
        if let Err(errno) = unistd::dup2(pipes[index].1.as_raw_fd(), libc::STDOUT_FILENO) {
            eprintln!("husk: cannot set up pipe: {errno}");
            return 1;
        }
    } else if let Some(path) = command_line.stdout_redirect() {
        match File::create(path) {
            Ok(file) => {
                if let Err(errno) = unistd::dup2(file.as_raw_fd(), libc::STDOUT_FILENO) {
                    eprintln!("husk: cannot redirect to '{path}': {errno}");
                    return 1;
                }
            }
            Err(error) => {
                eprintln!("husk: cannot open '{path}': {error}");
                return 1;
            }
        }
    }

    if index != 0 {
        if let Err(errno) = unistd::dup2(pipes[index - 1].0.as_raw_fd(), libc::STDIN_FILENO) {
            eprintln!("husk: cannot set up pipe: {errno}");
            return 1;
        }
    } else if let Some(path) = command_line.stdin_redirect() {
        match File::open(path) {
            Ok(file) => {
                if let Err(errno) = unistd::dup2(file.as_raw_fd(), libc::STDIN_FILENO) {
                    eprintln!("husk: cannot redirect from '{path}': {errno}");
                    return 1;
                }
            }
            Err(error) => {
                eprintln!("husk: cannot open '{path}': {error}");
                return 1;
            }
        }
    }

    // both ends of every pipe, used or not; the copies this stage needs now
    // live on stdin/stdout
    for (read, write) in pipes {
        let _ = unistd::close(read.as_raw_fd());
        let _ = unistd::close(write.as_raw_fd());
    }

    let program = command_line.commands()[index].program();
    let errno = match execvpe(argv[0].as_c_str(), argv, envp) {
        Err(errno) => errno,
        // execvpe only ever returns an error
        Ok(_) => Errno::EINVAL,
    };
    match errno {
        Errno::ENOENT => {
            eprintln!("husk: command '{program}' not found");
            127
        }
        Errno::EACCES => {
            eprintln!("husk: cannot run '{program}': permission denied");
            126
        }
        errno => {
            eprintln!("husk: cannot run '{program}': {errno}");
            126
        }
    }
}

fn stage_argv(command: &Command) -> Result<Vec<CString>, RunError> {
    command
        .args()
        .iter()
        .map(|arg| CString::new(arg.as_str()))
        .collect::<Result<_, _>>()
        .map_err(RunError::from)
}

/// Inherited environment with the line's overrides layered on top; the
/// override wins on a name collision. Built once and shared read-only by
/// every child of the pipeline.
fn merged_env<I>(
    inherited: I,
    overrides: &IndexMap<String, String>,
) -> Result<Vec<CString>, RunError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut merged: IndexMap<String, String> = inherited.into_iter().collect();
    for (name, value) in overrides {
        merged.insert(name.clone(), value.clone());
    }
    merged
        .iter()
        .map(|(name, value)| CString::new(format!("{name}={value}")))
        .collect::<Result<_, _>>()
        .map_err(RunError::from)
}
