mod app;
mod completion;
mod config;
mod constants;
mod controller;
mod credentials;
mod feedback;
#[cfg(test)]
mod http_stub;
mod input;
mod prompt;
mod session;
mod ui;

use anyhow::Result;
use std::env;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::config::{Config, ENV_OPENAI_API_KEY, ENV_TRUBRICS_EMAIL, ENV_TRUBRICS_PASSWORD};
use crate::credentials::CredentialStore;

fn setup_logging() {
    use std::fs::OpenOptions;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,emailsmith=debug"));

    // The TUI owns the terminal, so logs go to a file in the config directory
    let log_file = Config::config_dir()
        .ok()
        .and_then(|dir| std::fs::create_dir_all(&dir).ok().map(|_| dir))
        .map(|dir| dir.join("emailsmith.log"))
        .and_then(|path| {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .ok()
        });

    if let Some(file) = log_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else {
        // Fallback to stderr if file logging fails
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_usage() {
    eprintln!(
        r#"emailsmith - Improve your emails from the terminal

Usage: emailsmith [command]

Commands:
    (none)      Start the email improver
    setup       Store API keys in the OS keyring
    check       Show where credentials and config are found
    help        Show this help message

Environment:
    OPENAI_API_KEY      Completion service key
    TRUBRICS_EMAIL      Feedback service login (optional)
    TRUBRICS_PASSWORD   Feedback service password (optional)

Configuration file: ~/.config/emailsmith/config.toml
"#
    );
}

fn prompt_line(label: &str) -> Result<String> {
    use std::io::{self, Write};

    print!("{}", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn run_setup() -> Result<()> {
    println!("Emailsmith Setup");
    println!("================\n");
    println!("Values are stored in the OS keyring. Leave a field blank to skip it.\n");

    let store = CredentialStore::new();

    print!("OpenAI API key: ");
    std::io::Write::flush(&mut std::io::stdout())?;
    let api_key = rpassword_read()?;
    println!();
    if api_key.is_empty() {
        println!("Skipped {}.", ENV_OPENAI_API_KEY);
    } else if !api_key.starts_with("sk-") {
        println!("Note: OpenAI keys usually start with \"sk-\"; storing anyway.");
        store.set_secret(ENV_OPENAI_API_KEY, &api_key)?;
    } else {
        store.set_secret(ENV_OPENAI_API_KEY, &api_key)?;
    }

    let email = prompt_line("Trubrics email (optional): ")?;
    if !email.is_empty() {
        if !email.contains('@') {
            anyhow::bail!("Invalid email address: {}", email);
        }
        print!("Trubrics password: ");
        std::io::Write::flush(&mut std::io::stdout())?;
        let password = rpassword_read()?;
        println!();
        if password.is_empty() {
            anyhow::bail!("A password is required when a Trubrics email is given");
        }
        store.set_secret(ENV_TRUBRICS_EMAIL, &email)?;
        store.set_secret(ENV_TRUBRICS_PASSWORD, &password)?;
    }

    // Write a default config so the options are easy to discover
    let config_path = Config::config_path()?;
    if !config_path.exists() {
        Config::default().save()?;
        println!("Default configuration written to {}", config_path.display());
    }

    println!("\n{}", store.debug_info());
    println!("Setup complete! Run 'emailsmith' to start.");
    Ok(())
}

fn rpassword_read() -> Result<String> {
    use std::io;

    // Disable echo
    let _guard = DisableEcho::new()?;

    let mut password = String::new();
    io::stdin().read_line(&mut password)?;
    Ok(password.trim().to_string())
}

struct DisableEcho {
    #[cfg(unix)]
    original: libc::termios,
}

impl DisableEcho {
    #[cfg(unix)]
    fn new() -> Result<Self> {
        use std::mem::MaybeUninit;
        use std::os::unix::io::AsRawFd;

        let fd = std::io::stdin().as_raw_fd();
        let mut termios = MaybeUninit::<libc::termios>::uninit();

        unsafe {
            if libc::tcgetattr(fd, termios.as_mut_ptr()) != 0 {
                anyhow::bail!("Failed to get terminal attributes");
            }
            let original = termios.assume_init();
            let mut new = original;
            new.c_lflag &= !libc::ECHO;
            if libc::tcsetattr(fd, libc::TCSANOW, &new) != 0 {
                anyhow::bail!("Failed to set terminal attributes");
            }
            Ok(Self { original })
        }
    }

    #[cfg(not(unix))]
    fn new() -> Result<Self> {
        Ok(Self {})
    }
}

#[cfg(unix)]
impl Drop for DisableEcho {
    fn drop(&mut self) {
        use std::os::unix::io::AsRawFd;
        let fd = std::io::stdin().as_raw_fd();
        unsafe {
            libc::tcsetattr(fd, libc::TCSANOW, &self.original);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("help") | Some("--help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        Some("setup") => run_setup(),
        Some("check") => {
            print!("{}", CredentialStore::new().debug_info());
            Ok(())
        }
        Some(cmd) => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            std::process::exit(1);
        }
        None => {
            setup_logging();

            let config = Config::load()?;
            config.ensure_dirs()?;

            // Initialize theme from config
            crate::ui::theme::init_theme(config.ui.theme);

            let credentials = CredentialStore::new().load(&config);
            tracing::debug!(?credentials, "Resolved credentials");

            let mut app = App::new(config, credentials)?;
            app.run().await
        }
    }
}
