// SPDX: CC0-1.0

use anyhow::Context;
use chrono::{DateTime, Local};
use clap::Parser;
use function_plotter::{
    catalog::{Constants, FunctionKind},
    codec,
    shell::{self, Command},
    Domain, Function, Workspace, DELTA,
};
use std::{
    fs::{self, File},
    io::{stdout, BufWriter, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

#[derive(Debug, Parser)]
#[command(version, about = "Define, evaluate and save simple mathematical functions")]
struct Args {
    /// Workspace document to load at start-up
    #[arg(short, long)]
    workspace: Option<PathBuf>,

    /// Log debug messages (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

fn default_workspace_filename(now: DateTime<Local>) -> String {
    format!(
        "{}_workspace-{}.{}",
        env!("CARGO_PKG_NAME"),
        now.format("%Y-%m-%d_%H-%M-%S"),
        "json"
    )
}

fn main() -> ExitCode {
    match try_main(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("unexpected error: {err}");
            let chain = err.chain();
            if chain.len() > 1 {
                eprintln!();
                eprintln!("context:");
                for it in chain.skip(1) {
                    eprintln!("  {it}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug)]
struct State {
    workspace: Workspace,
    path: Option<PathBuf>,
}

fn try_main(args: Args) -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    let mut state = State {
        workspace: Workspace::new(),
        path: None,
    };

    let mut stdout = BufWriter::new(stdout());
    writeln!(stdout, "~~~Mathematical Function Plotter~~~")?;
    writeln!(stdout)?;

    if let Some(path) = args.workspace {
        match read_workspace(&path) {
            Ok(workspace) => {
                writeln!(stdout, "loaded {}", path.display())?;
                state.workspace = workspace;
                state.path = Some(path);
            }
            Err(err) => writeln!(stdout, "error: {err:#}")?,
        }
    }

    loop {
        let n = state.workspace.len();
        writeln!(
            stdout,
            "workspace has {n} function{s}",
            s = if n == 1 { "" } else { "s" }
        )?;

        let mut try_cmd = shell::input(&mut stdout, "> ")?;
        try_cmd.make_ascii_lowercase();
        writeln!(stdout)?;

        if let Ok(cmd) = try_cmd.parse::<Command>() {
            match cmd {
                Command::Help => {
                    for c in Command::exhaustive() {
                        write!(stdout, "{name}", name = c.name())?;
                        if !c.aliases().is_empty() {
                            write!(stdout, " ({})", c.aliases().join(", "))?;
                        }
                        writeln!(stdout, ": {help}", help = c.help())?;
                    }
                }

                Command::Quit => break,

                Command::Add => add_function(&mut stdout, &mut state)?,

                Command::List => {
                    if state.workspace.is_empty() {
                        shell::workspace_empty(&mut stdout)?;
                    }
                    for (name, function) in &state.workspace {
                        shell::dump_function(&mut stdout, name, function)?;
                    }
                }

                Command::Eval => eval_function(&mut stdout, &state)?,

                Command::Remove => remove_function(&mut stdout, &mut state)?,

                Command::Save => save_workspace(&mut stdout, &mut state)?,

                Command::Load => load_workspace(&mut stdout, &mut state)?,
            }
        } else {
            writeln!(stdout, r#"Unknown command, try "help" for help"#)?;
            shell::note_similar(
                &mut stdout,
                "command",
                &try_cmd,
                Command::exhaustive().iter().map(|c| c.name()),
            )?;
        }

        writeln!(stdout)?;
    }
    stdout.flush()?;
    Ok(())
}

fn add_function<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    let name = shell::input(&mut out, "name = ")?;
    if name.is_empty() {
        writeln!(out, "error: function name must not be empty")?;
        return Ok(());
    }
    if state.workspace.contains(&name) {
        writeln!(out, "note: '{name}' already exists and will be replaced")?;
    }

    for (i, kind) in FunctionKind::exhaustive().iter().enumerate() {
        writeln!(out, "{n} - {kind} ({expr})", n = i + 1, expr = kind.expression())?;
    }
    let Some(kind) = read_kind(&mut out)? else {
        return Ok(());
    };

    writeln!(out, "note: the function is sampled every {DELTA} from the left boundary")?;
    let Some(left) = shell::read_number(&mut out, "left boundary = ")? else {
        return Ok(());
    };
    let Some(right) = shell::read_number(&mut out, "right boundary = ")? else {
        return Ok(());
    };
    let domain = match Domain::checked(left, right) {
        Ok(domain) => domain,
        Err(err) => {
            writeln!(out, "error: {err}")?;
            return Ok(());
        }
    };

    writeln!(out, "{kind}: {}", kind.expression())?;
    let mut constants = Constants::new();
    for c in kind.constant_names() {
        let Some(val) = shell::read_number(&mut out, format_args!("{c} = "))? else {
            return Ok(());
        };
        constants.insert(*c, val);
    }

    let function = Function::new(kind, constants, domain).context("failed to build function")?;
    writeln!(out, "{name}: {function}")?;
    log::debug!("adding '{name}' with {} samples", function.len());
    state.workspace.add(function, name);
    Ok(())
}

fn read_kind<W: Write>(mut out: W) -> anyhow::Result<Option<FunctionKind>> {
    let text = shell::input(&mut out, "type = ")?;
    let kinds = FunctionKind::exhaustive();
    if let Ok(n) = text.parse::<usize>() {
        if (1..=kinds.len()).contains(&n) {
            return Ok(Some(kinds[n - 1]));
        }
    }
    match text.to_ascii_lowercase().parse::<FunctionKind>() {
        Ok(kind) => Ok(Some(kind)),
        Err(err) => {
            writeln!(out, "error: {err}")?;
            shell::note_similar(&mut out, "type", &text, kinds.iter().map(|k| k.name()))?;
            Ok(None)
        }
    }
}

/// Prompts for the name of an existing function.
fn read_function_name<W: Write>(mut out: W, workspace: &Workspace) -> anyhow::Result<Option<String>> {
    if workspace.is_empty() {
        shell::workspace_empty(&mut out)?;
        return Ok(None);
    }
    let name = shell::input(&mut out, "function name = ")?;
    if workspace.contains(&name) {
        Ok(Some(name))
    } else {
        shell::no_such_function(&mut out, &name)?;
        shell::note_similar(&mut out, "function", &name, workspace.names())?;
        Ok(None)
    }
}

fn eval_function<W: Write>(mut out: W, state: &State) -> anyhow::Result<()> {
    let Some(name) = read_function_name(&mut out, &state.workspace)? else {
        return Ok(());
    };
    let Some(function) = state.workspace.get(&name) else {
        return Ok(());
    };
    let Some(x) = shell::read_number(&mut out, "x = ")? else {
        return Ok(());
    };

    match function.evaluate(x) {
        Ok(y) => {
            writeln!(out, "{name}({x}) = {y}")?;
            if !function.domain().contains(x) {
                writeln!(
                    out,
                    "note: {x} lies outside the domain {}, so it was never sampled",
                    function.domain()
                )?;
            }
        }
        Err(err) => writeln!(out, "evaluation error: {err}")?,
    }
    Ok(())
}

fn remove_function<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    let Some(name) = read_function_name(&mut out, &state.workspace)? else {
        return Ok(());
    };
    if state.workspace.remove(&name).is_some() {
        writeln!(out, "removed '{name}'")?;
    }
    Ok(())
}

fn save_workspace<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    let default = state
        .path
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_workspace_filename(Local::now())));
    writeln!(out, "note: leave blank to save to {}", default.display())?;
    let text = shell::input(&mut out, "path = ")?;
    let path = if text.is_empty() {
        default
    } else {
        PathBuf::from(text)
    };

    match write_workspace(&state.workspace, &path) {
        Ok(()) => {
            writeln!(out, "saved workspace to {}", path.display())?;
            state.path = Some(path);
        }
        Err(err) => writeln!(out, "error: {err:#}")?,
    }
    Ok(())
}

fn load_workspace<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    if let Some(ref path) = state.path {
        writeln!(out, "note: leave blank to reload {}", path.display())?;
    }
    let text = shell::input(&mut out, "path = ")?;
    let path = match (text.is_empty(), &state.path) {
        (false, _) => PathBuf::from(text),
        (true, Some(path)) => path.clone(),
        (true, None) => {
            writeln!(out, "error: no path given")?;
            return Ok(());
        }
    };

    match read_workspace(&path) {
        Ok(workspace) => {
            writeln!(
                out,
                "loaded {n} function(s) from {p}",
                n = workspace.len(),
                p = path.display()
            )?;
            state.workspace = workspace;
            state.path = Some(path);
        }
        Err(err) => writeln!(out, "error: {err:#}")?,
    }
    Ok(())
}

fn write_workspace(workspace: &Workspace, path: &Path) -> anyhow::Result<()> {
    let mut file = BufWriter::new(
        File::create(path)
            .with_context(|| format!("failed to open {} for writing", path.display()))?,
    );
    codec::write(workspace, &mut file).context("failed to write workspace document")?;
    file.flush()?;
    file.get_mut().sync_data()?;
    log::info!("wrote {} function(s) to {}", workspace.len(), path.display());
    Ok(())
}

fn read_workspace(path: &Path) -> anyhow::Result<Workspace> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let workspace = codec::decode(&text)?;
    log::info!("read {} function(s) from {}", workspace.len(), path.display());
    Ok(workspace)
}
