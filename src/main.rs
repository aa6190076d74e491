mod shell;

#[cfg(test)]
mod test;

use shell::Shell;
use tracing_subscriber::EnvFilter;

fn main() {
    // stderr keeps stdout clean for pipeline data
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let status = Shell::new().run();
    std::process::exit(status);
}
