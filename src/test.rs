#[cfg(test)]
mod tests {
    use std::{env, fs, sync::Mutex};

    use tempfile::tempdir;

    use crate::shell::{
        parser::{command_line::CommandLine, ParsedLine, Parser},
        runner::{self, exit_status::ExitStatus},
    };

    // forked children and descriptor counting do not mix well with other
    // tests doing the same at the same time
    static RUN_LOCK: Mutex<()> = Mutex::new(());

    fn parse_one(src: &str) -> CommandLine {
        let mut parser = Parser::new("test".to_string(), src.to_string());
        match parser.parse_line().unwrap() {
            ParsedLine::Pipeline(command_line) => command_line,
            other => panic!("expected a pipeline, got {other:?}"),
        }
    }

    fn run(src: &str) -> Vec<ExitStatus> {
        runner::run(&parse_one(src), env::vars()).unwrap()
    }

    #[test]
    fn pipeline_produces_one_status_per_stage_and_the_data_flows() {
        let _guard = RUN_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");

        let statuses = run(&format!("printf hi | cat > {}", out.display()));
        assert_eq!(statuses, vec![ExitStatus::Exited(0), ExitStatus::Exited(0)]);
        assert_eq!(fs::read_to_string(&out).unwrap(), "hi");
    }

    #[test]
    fn exit_codes_are_reported_per_stage() {
        let _guard = RUN_LOCK.lock().unwrap();
        let statuses = run("sh -c \"exit 3\"");
        assert_eq!(statuses, vec![ExitStatus::Exited(3)]);
        assert_eq!(statuses[0].code(), 3);
        assert!(!statuses[0].success());
    }

    #[test]
    fn missing_program_fails_only_its_own_stage() {
        let _guard = RUN_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");

        let statuses = run(&format!(
            "true | husk-missing-program-for-tests | cat > {}",
            out.display()
        ));
        assert_eq!(
            statuses,
            vec![
                ExitStatus::Exited(0),
                ExitStatus::Exited(127),
                ExitStatus::Exited(0),
            ]
        );
    }

    #[test]
    fn input_redirect_feeds_the_first_stage() {
        let _guard = RUN_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let input = dir.path().join("in");
        let out = dir.path().join("out");
        fs::write(&input, "alpha\nbeta\n").unwrap();

        let statuses = run(&format!("cat < {} > {}", input.display(), out.display()));
        assert_eq!(statuses, vec![ExitStatus::Exited(0)]);
        assert_eq!(fs::read_to_string(&out).unwrap(), "alpha\nbeta\n");
    }

    #[test]
    fn output_redirect_truncates_an_existing_file() {
        let _guard = RUN_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        fs::write(&out, "something much longer than the new content").unwrap();

        run(&format!("printf new > {}", out.display()));
        assert_eq!(fs::read_to_string(&out).unwrap(), "new");
    }

    #[test]
    fn environment_overrides_reach_the_children() {
        let _guard = RUN_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");

        let statuses = run(&format!(
            "HUSK_TEST_GREETING=hello sh -c \"printf %s $HUSK_TEST_GREETING\" > {}",
            out.display()
        ));
        assert_eq!(statuses, vec![ExitStatus::Exited(0)]);
        assert_eq!(fs::read_to_string(&out).unwrap(), "hello");
        // the override is scoped to the pipeline, not the shell process
        assert!(env::var("HUSK_TEST_GREETING").is_err());
    }

    #[test]
    fn signal_deaths_are_distinguished_from_exits() {
        let _guard = RUN_LOCK.lock().unwrap();
        let statuses = run("sh -c \"kill -9 $$\"");
        assert_eq!(statuses, vec![ExitStatus::Signaled(9)]);
        assert_eq!(statuses[0].code(), 137);
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn parent_holds_no_descriptors_after_a_run() {
        let _guard = RUN_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        let line = format!("printf x | cat | cat > {}", out.display());
        let command_line = parse_one(&line);

        let before = open_fds();
        runner::run(&command_line, env::vars()).unwrap();
        assert_eq!(open_fds(), before);
    }

    #[cfg(target_os = "linux")]
    fn open_fds() -> usize {
        fs::read_dir("/proc/self/fd").unwrap().count()
    }
}
