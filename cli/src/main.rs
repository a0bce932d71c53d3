mod filter;
mod logging;

use std::ffi::OsStr;
use std::io::{self, BufWriter, Write};
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result, bail};
use clap::Parser;
use getdents::{DEFAULT_BUFF_SIZE, Options};
use log::debug;

use filter::TypeFilter;
use logging::Logger;

#[derive(Parser, Debug)]
#[command(version, about = "List one directory with raw getdents64 reads")]
struct Cli {
    /// Directory to list
    path: PathBuf,
    /// Shuffle entries within each read batch
    #[arg(long)]
    random: bool,
    /// Print the number of entries instead of the entries
    #[arg(long)]
    count: bool,
    /// Print entry names instead of PATH/name
    #[arg(long)]
    namesonly: bool,
    /// Do not print regular files
    #[arg(long)]
    nofiles: bool,
    /// Do not print directories
    #[arg(long)]
    nodirs: bool,
    /// Do not print symbolic links
    #[arg(long)]
    nosymlinks: bool,
    /// Do not print sockets
    #[arg(long)]
    nosockets: bool,
    /// Do not print block devices
    #[arg(long)]
    noblock: bool,
    /// Do not print character devices
    #[arg(long)]
    nochar: bool,
    /// Do not print fifos
    #[arg(long)]
    nofifo: bool,
    /// Run CMD with each result's path and print its output before the path
    #[arg(long, value_name = "CMD")]
    exec: Option<PathBuf>,
    /// Terminate items with a newline instead of a NUL byte
    #[arg(long)]
    printn: bool,
    /// Buffer size in bytes for each getdents64 call
    #[arg(long, default_value_t = DEFAULT_BUFF_SIZE)]
    buffer_size: usize,
    /// Debugging output on stderr
    #[arg(long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> Options {
        Options::new()
            .buffer_size(self.buffer_size)
            .randomize(self.random)
    }

    fn filter(&self) -> TypeFilter {
        TypeFilter {
            no_files: self.nofiles,
            no_dirs: self.nodirs,
            no_symlinks: self.nosymlinks,
            no_sockets: self.nosockets,
            no_block_devices: self.noblock,
            no_char_devices: self.nochar,
            no_fifos: self.nofifo,
        }
    }
}

/// `parent/name`, without doubling a trailing slash on `parent`.
fn join(parent: &[u8], name: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(parent.len() + 1 + name.len());
    out.extend_from_slice(parent);
    if !parent.ends_with(b"/") {
        out.push(b'/');
    }
    out.extend_from_slice(name);
    out
}

/// Run `command path` and return its stdout, minus one trailing newline.
fn exec_on(command: &OsStr, path: &[u8]) -> Result<Vec<u8>> {
    let output = Command::new(command)
        .arg(OsStr::from_bytes(path))
        .output()
        .with_context(|| format!("failed to run '{}'", command.to_string_lossy()))?;
    if !output.status.success() {
        bail!(
            "'{}' exited with {} for '{}'",
            command.to_string_lossy(),
            output.status,
            String::from_utf8_lossy(path)
        );
    }

    let mut stdout = output.stdout;
    if stdout.last() == Some(&b'\n') {
        stdout.pop();
    }
    Ok(stdout)
}

fn run(cli: &Cli) -> Result<()> {
    debug!("listing {:?} with {:?}", cli.path, cli.options());

    let names = getdents::getdents(&cli.path, cli.options())
        .with_context(|| format!("cannot access '{}'", cli.path.display()))?;
    let filter = cli.filter();
    let end = if cli.printn { b'\n' } else { b'\0' };
    let parent = cli.path.as_os_str().as_bytes();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut count = 0u64;

    for entry in names {
        let entry = entry.with_context(|| format!("error reading '{}'", cli.path.display()))?;
        if entry.is_dot() || filter.excludes(&entry) {
            continue;
        }
        count += 1;
        if cli.count {
            continue;
        }
        if let Some(command) = &cli.exec {
            let path = join(parent, &entry.name);
            out.write_all(&exec_on(command.as_os_str(), &path)?)?;
            out.write_all(b" ")?;
            out.write_all(&path)?;
        } else if cli.namesonly {
            out.write_all(&entry.name)?;
        } else {
            out.write_all(&join(parent, &entry.name))?;
        }
        out.write_all(&[end])?;
    }

    if cli.count {
        writeln!(out, "{count}")?;
    }
    out.flush()?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    Logger::init(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("getdents: {e:#}");
        std::process::exit(1);
    }
}
