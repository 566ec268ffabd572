#[tokio::main]
async fn main() {
  // Minimal CLI: support --version/-V
  let mut args = std::env::args().skip(1);
  if let Some(arg) = args.next() {
    if arg == "--version" || arg == "-V" {
      println!("logbox {}", env!("CARGO_PKG_VERSION"));
      return;
    }
    // Allow running without args; any other arg prints help
    if arg == "--help" || arg == "-h" {
      eprintln!("Usage: logbox [--version]");
      return;
    }
  }

  let config = match logbox::app::Config::from_env() {
    Ok(c) => c,
    Err(e) => {
      eprintln!("error: {e}");
      std::process::exit(1);
    }
  };

  if let Err(e) = logbox::app::run(config).await {
    eprintln!("error: {e}");
    std::process::exit(1);
  }
}
