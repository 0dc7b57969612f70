use clap::{CommandFactory, Parser, Subcommand};
use mdpress::{build::SiteBuilder, scaffold, serve};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mdpress")]
#[command(about = "Static blog generator for CTF write-ups and technical articles")]
#[command(long_about = "\
Static blog generator for CTF write-ups and technical articles

Each markdown file in the articles directory becomes one HTML page. An
optional YAML front matter block supplies metadata; everything it omits is
defaulted (title from the filename, today's date, difficulty Easy, an
excerpt cut from the body). The home page's article list is rewritten in
place between two marker comments on every build.

Project structure:

  index.html                   # Home page (list region rewritten by build)
  article-template.md          # Scaffold for new articles (never built)
  static/main.css              # Stylesheet
  articles/
  ├── htb_example.md           # Source article
  └── htb_example.html         # Rendered page (build output)

Front matter keys: title, difficulty, date, tags, featured, excerpt,
type (writeup|article), reading_speed (chars/minute). Unknown keys are
kept but unused.

Run 'mdpress init' to scaffold a project.")]
#[command(version)]
struct Cli {
    /// Articles source directory
    #[arg(long, default_value = "articles", global = true)]
    source: PathBuf,

    /// Output directory for rendered pages
    #[arg(long, default_value = "articles", global = true)]
    output: PathBuf,

    /// Index page whose article-list region gets rewritten
    #[arg(long, default_value = "index.html", global = true)]
    index: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Scaffold a project: template, example article, index page, stylesheet
    Init,
    /// Create an article from the template (prompts for missing values)
    New {
        title: Option<String>,
        difficulty: Option<String>,
        /// Comma-separated tag list
        tags: Option<String>,
    },
    /// Build all articles and rewrite the index article list
    Build,
    /// Print the article catalog, newest first
    List,
    /// Preview server, loopback only
    Serve {
        /// Port to listen on
        #[arg(default_value_t = serve::DEFAULT_PORT)]
        port: u16,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Command::Init => {
            scaffold::init(&PathBuf::from("."), &cli.source, &cli.index)?;
        }
        Command::New {
            title,
            difficulty,
            tags,
        } => {
            std::fs::create_dir_all(&cli.source)?;
            scaffold::new_article(&PathBuf::from("."), &cli.source, title, difficulty, tags)?;
        }
        Command::Build => {
            println!("==> Building {}", cli.source.display());
            let builder = SiteBuilder::new(cli.source, cli.output, cli.index);
            builder.build()?;
        }
        Command::List => {
            let builder = SiteBuilder::new(cli.source, cli.output, cli.index);
            builder.list()?;
        }
        Command::Serve { port } => {
            serve::serve(&std::env::current_dir()?, port)?;
        }
    }

    Ok(())
}
