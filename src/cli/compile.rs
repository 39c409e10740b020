//! Compile command implementation

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use super::{EXIT_ERROR, EXIT_SUCCESS};
use crate::compiler::LightningCompiler;
use crate::config::{find_config, load_config, merge_cli_overrides, CliOverrides};
use crate::progress::{ConsoleLog, NullLog, ProgressLog};
use crate::stage::CompileStage;

/// Run the compile command
pub fn run_compile(
    config_path: Option<&Path>,
    no_write: bool,
    minify: bool,
    print_state: bool,
) -> ExitCode {
    let config_path = match config_path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    let mut config = match load_config(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let overrides = CliOverrides { no_write, minify: minify.then_some(true) };
    merge_cli_overrides(&mut config, &overrides);

    let project_root = config_path
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_default();

    let compiler = LightningCompiler::new().with_minify(config.compile.minify);
    // Progress lines share stdout with --print-state JSON, so mute them when
    // the payload is requested.
    let progress: Arc<dyn ProgressLog> =
        if print_state { Arc::new(NullLog::new()) } else { Arc::new(ConsoleLog::new()) };

    let mut stage = CompileStage::new(Box::new(compiler))
        .with_destinations_map(config.destinations_map(&project_root))
        .with_progress(progress);
    if !config.compile.write {
        stage.disable_write_file();
    }

    let result = stage.run();

    if result.is_success() {
        if print_state {
            match serde_json::to_string_pretty(&result.data) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing stage payload: {}", e);
                    return ExitCode::from(EXIT_ERROR);
                }
            }
        } else {
            println!("{}", result.message);
        }
        ExitCode::from(EXIT_SUCCESS)
    } else {
        eprintln!("{}", result.message);
        ExitCode::from(result.exit_code())
    }
}
