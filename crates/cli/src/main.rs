use std::{
  fs::File,
  io::{stdout, Read, Seek, SeekFrom},
  path::PathBuf,
  process::ExitCode,
};

use clap::Parser as ClapParser;
use flate2::{read::GzDecoder, write::GzEncoder, Compression};

use pxd::PxdError;

/// Gzip's two-byte magic number (RFC 1952 §2.3.1).
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, ClapParser)]
#[clap(author, version, about = "Read and write PXD files, with transparent gzip support.", long_about = None)]
struct Args {
  /// Input file, auto-detected as gzip-compressed or plain text.
  infile: PathBuf,
  /// Output file (else write to standard output).
  outfile: Option<PathBuf>,
  /// Gzip-compress the output. Ignored when writing to standard output.
  #[clap(short = 'z', long)]
  compress: bool,
  /// Indentation width, 0..=9; out-of-range values fall back to 2.
  #[clap(short = 'i', long, default_value_t = 2)]
  indent: usize,
}

fn main() -> ExitCode {
  env_logger::init();
  let args = Args::parse();
  match run(&args) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("pxd: {}", e);
      ExitCode::FAILURE
    }
  }
}

fn run(args: &Args) -> Result<(), PxdError> {
  let text = read_input(&args.infile)?;
  let (value, custom) = pxd::read(&text)?;
  write_output(args, &value, &custom)
}

/// Reads `path`, transparently decompressing it if it starts with the gzip
/// magic number.
fn read_input(path: &PathBuf) -> Result<String, PxdError> {
  let mut file = File::open(path)?;
  let mut magic = [0u8; 2];
  let read = file.read(&mut magic)?;
  file.seek(SeekFrom::Start(0))?;
  let mut text = String::new();
  if read == GZIP_MAGIC.len() && magic == GZIP_MAGIC {
    GzDecoder::new(file).read_to_string(&mut text)?;
  } else {
    file.read_to_string(&mut text)?;
  }
  Ok(text)
}

/// Writes the document to `args.outfile`, or to standard output if absent.
/// Compression only ever applies to a file destination (`spec.md` §6).
fn write_output(args: &Args, value: &pxd::Value, custom: &str) -> Result<(), PxdError> {
  match &args.outfile {
    Some(path) => {
      let file = File::create(path)?;
      if args.compress {
        let mut encoder = GzEncoder::new(file, Compression::default());
        pxd::write(&mut encoder, value, custom, args.indent)?;
        encoder.finish()?;
        Ok(())
      } else {
        pxd::write(file, value, custom, args.indent)
      }
    }
    None => {
      let stdout = stdout();
      pxd::write(stdout.lock(), value, custom, args.indent)
    }
  }
}
