use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::process::ExitCode;

use clap::Parser;
use regcc::lexer::Lexer;
use regcc::{compile, parse, ParseErr};
use regcc_routines::{run, DEFAULT_ENTRY_NAME};

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while",
];

const ROUTINE_PREFIXES: &[&str] = &["atom_", "piece_", "branch_", "regex_"];

/// Compiles a regular expression into Rust matcher routines, written to stdout.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Name of the public entry routine.
    #[arg(long, default_value = DEFAULT_ENTRY_NAME, value_parser = entry_name)]
    entry: String,
    /// Dump the token stream and syntax tree to stderr.
    #[arg(short, long)]
    debug: bool,
    /// Evaluate the compiled pattern against INPUT and report the result on stderr.
    #[arg(long, value_name = "INPUT")]
    check: Vec<OsString>,
    /// The pattern to compile.
    pattern: OsString,
}

/// Returns the raw bytes of an argument. Patterns and inputs are byte
/// strings, so they need not be valid UTF-8.
#[cfg(unix)]
fn arg_bytes(arg: &OsStr) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;

    Cow::Borrowed(arg.as_bytes())
}

#[cfg(not(unix))]
fn arg_bytes(arg: &OsStr) -> Cow<'_, [u8]> {
    match arg.to_string_lossy() {
        Cow::Borrowed(arg) => Cow::Borrowed(arg.as_bytes()),
        Cow::Owned(arg) => Cow::Owned(arg.into_bytes()),
    }
}

/// Accepts a plain Rust identifier that cannot collide with a generated
/// routine name.
fn entry_name(name: &str) -> Result<String, String> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid_start || !valid_rest || name == "_" {
        return Err(format!("'{}' is not a valid Rust identifier", name));
    }
    if KEYWORDS.contains(&name) {
        return Err(format!("'{}' is a reserved keyword", name));
    }

    let generated = ROUTINE_PREFIXES.iter().any(|prefix| {
        name.strip_prefix(prefix)
            .map_or(false, |id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
    });
    if generated {
        return Err(format!("'{}' collides with a generated routine name", name));
    }

    Ok(name.to_string())
}

fn dump_tokens(pattern: &[u8]) -> Result<(), ParseErr> {
    let mut lexer = Lexer::new(pattern);

    eprintln!("TOKENS\n--------");
    loop {
        let token = lexer.next_token()?;
        eprintln!(
            "{:>4}..{:<4} {:?} {}",
            token.span.start,
            token.span.end(),
            token.kind,
            lexer.annotation(&token)
        );

        if token.is_end() {
            break;
        }
    }
    eprintln!("--------");

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let pattern = arg_bytes(&args.pattern);

    if args.debug {
        if let Err(e) = dump_tokens(&pattern) {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let regex = match parse(&pattern) {
        Ok(regex) => regex,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.debug {
        eprintln!("AST\n--------\n{:#?}\n--------", regex);
    }

    let routines = compile(&regex).with_entry_name(args.entry);

    for input in args.check.iter() {
        match run(&routines, &arg_bytes(input)) {
            Some(len) => eprintln!("{:?}: matched {} byte(s)", input, len),
            None => eprintln!("{:?}: no match", input),
        }
    }

    print!("{}", routines);

    ExitCode::SUCCESS
}
