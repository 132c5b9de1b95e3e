#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::server::config::ServerConfig;
    use crate::server::heptc::{artifact_dir, build_command};

    fn config() -> ServerConfig {
        ServerConfig::default()
    }

    #[test]
    fn minimal_command() {
        let argv = build_command(&config(), Path::new("/ws/main.ept"), None, None);
        assert_eq!(argv, vec!["heptc", "-target", "c", "/ws/main.ept"]);
    }

    #[test]
    fn verbose_flag_comes_first() {
        let mut cfg = config();
        cfg.verbose_compiling = true;
        let argv = build_command(&cfg, Path::new("main.ept"), None, None);
        assert_eq!(argv[..2], ["heptc".to_string(), "-v".to_string()]);
    }

    #[test]
    fn target_path_and_entry_node() {
        let argv = build_command(
            &config(),
            Path::new("main.ept"),
            Some(Path::new("/ws/build")),
            Some("f"),
        );
        assert_eq!(
            argv,
            vec!["heptc", "-targetpath", "/ws/build", "-target", "c", "-s", "f", "main.ept"]
        );
    }

    #[test]
    fn supplementary_options_are_split_on_whitespace() {
        let mut cfg = config();
        cfg.supplementary_options = Some("-O2  -nocaus".to_string());
        let argv = build_command(&cfg, Path::new("main.ept"), None, None);
        assert_eq!(
            argv,
            vec!["heptc", "-target", "c", "-O2", "-nocaus", "main.ept"]
        );
    }

    #[test]
    fn java_target_is_honored() {
        let mut cfg = config();
        cfg.target_language = "java".to_string();
        let argv = build_command(&cfg, Path::new("main.ept"), None, None);
        assert!(argv.windows(2).any(|w| w == ["-target", "java"]));
    }

    #[test]
    fn artifact_dir_is_stem_plus_language() {
        let dir = artifact_dir(Path::new("/ws/build"), Path::new("/ws/main.ept"), "c");
        assert_eq!(dir, Path::new("/ws/build/main_c"));
        let dir = artifact_dir(Path::new("/ws"), Path::new("/ws/main.ept"), "java");
        assert_eq!(dir, Path::new("/ws/main_java"));
    }
}
