//! CLI tool to dump the token stream of Lua source files.

use std::fs;
use std::process::ExitCode;

use lualex::{Features, LexError, Lexer, LuaVersion, Options};
use tracing_subscriber::EnvFilter;

fn usage() {
    eprintln!("Usage: lualex [options] <files...>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --lua-version <V>        5.1 (default), 5.2, 5.3 or JIT");
    eprintln!("  --comments               Print comments as well");
    eprintln!("  --extended-identifiers   Allow non-ASCII identifiers");
    eprintln!("  --keep-shebang           Lex a leading #! line");
    eprintln!("  --const                  Enable the const keyword");
    eprintln!("  --type-check             Enable the declare keyword");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  lualex script.lua");
    eprintln!("  lualex --lua-version 5.3 --comments init.lua");
}

/// Output lines for one file, and the token count or the error that
/// stopped lexing.
struct Dump {
    lines: Vec<String>,
    outcome: Result<usize, LexError>,
}

fn dump(path: &str, content: &str, options: &Options) -> Dump {
    let mut lexer = Lexer::new(content, options);
    let mut lines = Vec::new();
    let mut count = 0_usize;
    let mut failure = None;
    for result in lexer.by_ref() {
        match result {
            Ok(token) => {
                lines.push(format!(
                    "{path}:{}:{}: {}",
                    token.span.line,
                    token.span.column() + 1,
                    token.kind
                ));
                count += 1;
            }
            Err(e) => failure = Some(e),
        }
    }

    for comment in lexer.comments() {
        lines.push(format!(
            "{path}:{}:{}: comment {:?}",
            comment.start.line,
            comment.start.column() + 1,
            comment.value
        ));
    }

    Dump {
        lines,
        outcome: failure.map_or(Ok(count), Err),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args[0] == "--help" || args[0] == "-h" {
        usage();
        return ExitCode::from(2);
    }

    let mut options = Options::new();
    let mut files = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--lua-version" => {
                let Some(value) = iter.next() else {
                    eprintln!("Error: --lua-version needs a value");
                    return ExitCode::from(2);
                };
                match value.parse::<LuaVersion>() {
                    Ok(version) => options = options.lua_version(version),
                    Err(e) => {
                        eprintln!("Error: {e}");
                        return ExitCode::from(2);
                    }
                }
            }
            "--comments" => options = options.comments(true),
            "--extended-identifiers" => options = options.extended_identifiers(true),
            "--keep-shebang" => options = options.ignore_shebang(false),
            "--const" => options = options.enable(Features::CONST),
            "--type-check" => options = options.enable(Features::TYPE_CHECK),
            flag if flag.starts_with("--") => {
                eprintln!("Unknown option: {flag}");
                return ExitCode::from(2);
            }
            path => files.push(path),
        }
    }

    if files.is_empty() {
        eprintln!("Error: no files specified");
        return ExitCode::from(2);
    }

    let mut had_error = false;

    for path in files {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{path}: {e}");
                had_error = true;
                continue;
            }
        };

        let result = dump(path, &content, &options.clone().chunk_name(path));
        for line in &result.lines {
            println!("{line}");
        }
        match result.outcome {
            Ok(count) => eprintln!("{path}: {count} token(s)"),
            Err(e) => {
                eprintln!("{e}");
                had_error = true;
            }
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
