//! profilepdf CLI - single-page profile sheet generator

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use profilepdf::{
    inspect_file, Download, DocumentSpec, FieldEntry, LayoutEngine, LayoutOptions, PlayerProfile,
    DEFAULT_FILENAME,
};

#[derive(Parser)]
#[command(name = "profilepdf")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Generate single-page player profile PDFs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a volleyball player profile sheet
    Profile {
        #[command(flatten)]
        player: PlayerArgs,

        /// Read the whole profile from a JSON file instead of flags
        #[arg(long, value_name = "FILE", conflicts_with_all = ["name", "position", "dob", "email"])]
        from: Option<PathBuf>,

        /// Profile photo (JPEG or PNG)
        #[arg(long, value_name = "FILE")]
        photo: Option<PathBuf>,

        /// Sheet title
        #[arg(long, default_value = "")]
        title: String,

        /// Output file
        #[arg(short, long, value_name = "FILE", default_value = DEFAULT_FILENAME)]
        output: PathBuf,

        /// Layout options JSON
        #[arg(long, value_name = "FILE", env = "PROFILEPDF_LAYOUT")]
        layout: Option<PathBuf>,

        /// Also print an HTML download link
        #[arg(long)]
        link: bool,
    },

    /// Render arbitrary label/value rows
    Render {
        /// Sheet title
        #[arg(long, default_value = "")]
        title: String,

        /// Row as "Label=Value" (repeatable, printed in order)
        #[arg(short, long = "field", value_name = "LABEL=VALUE")]
        fields: Vec<String>,

        /// Image for the top-right box (JPEG or PNG)
        #[arg(long, value_name = "FILE")]
        image: Option<PathBuf>,

        /// Output file
        #[arg(short, long, value_name = "FILE", default_value = DEFAULT_FILENAME)]
        output: PathBuf,

        /// Layout options JSON
        #[arg(long, value_name = "FILE", env = "PROFILEPDF_LAYOUT")]
        layout: Option<PathBuf>,
    },

    /// Show what a generated PDF contains
    Inspect {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

/// Profile form fields.
#[derive(Args, Default)]
struct PlayerArgs {
    /// Full name
    #[arg(long)]
    name: Option<String>,

    /// High Attacker, Quick Attacker, Setter or Libero
    #[arg(long)]
    position: Option<String>,

    /// Height in centimeters
    #[arg(long = "height")]
    height_cm: Option<String>,

    /// Weight in kilograms
    #[arg(long = "weight")]
    weight_kg: Option<String>,

    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    dob: Option<NaiveDate>,

    #[arg(long)]
    email: Option<String>,

    /// Personal address
    #[arg(long, default_value = "")]
    address: String,

    #[arg(long)]
    mobile: Option<String>,

    #[arg(long)]
    whatsapp: Option<String>,

    /// Workplace, or N/A
    #[arg(long, default_value = "N/A")]
    workplace: String,

    /// Workplace address, or N/A
    #[arg(long, default_value = "N/A")]
    work_address: String,

    /// International tournaments of the last five years, or N/A
    #[arg(long, default_value = "N/A")]
    tournaments: String,
}

impl PlayerArgs {
    fn into_profile(self) -> Result<PlayerProfile, Box<dyn std::error::Error>> {
        Ok(PlayerProfile {
            name: required(self.name, "name")?,
            position: required(self.position, "position")?.parse()?,
            height_cm: required(self.height_cm, "height")?,
            weight_kg: required(self.weight_kg, "weight")?,
            date_of_birth: required(self.dob, "dob")?,
            email: required(self.email, "email")?,
            address: self.address,
            mobile: required(self.mobile, "mobile")?,
            whatsapp: required(self.whatsapp, "whatsapp")?,
            workplace: self.workplace,
            work_address: self.work_address,
            tournaments: self.tournaments,
        })
    }
}

fn required<T>(value: Option<T>, flag: &str) -> Result<T, String> {
    value.ok_or_else(|| format!("--{} is required (or use --from)", flag))
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Profile {
            player,
            from,
            photo,
            title,
            output,
            layout,
            link,
        }) => cmd_profile(
            player,
            from.as_deref(),
            photo.as_deref(),
            &title,
            &output,
            layout.as_deref(),
            link,
        ),
        Some(Commands::Render {
            title,
            fields,
            image,
            output,
            layout,
        }) => cmd_render(&title, &fields, image.as_deref(), &output, layout.as_deref()),
        Some(Commands::Inspect { input, json }) => cmd_inspect(&input, json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: profilepdf <COMMAND>".yellow());
            println!("       profilepdf --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn engine(layout: Option<&Path>) -> Result<LayoutEngine, Box<dyn std::error::Error>> {
    let options = match layout {
        Some(path) => {
            log::debug!("Loading layout options from {}", path.display());
            LayoutOptions::load(path)?
        }
        None => LayoutOptions::default(),
    };
    Ok(LayoutEngine::new(options)?)
}

fn cmd_profile(
    player: PlayerArgs,
    from: Option<&Path>,
    photo: Option<&Path>,
    title: &str,
    output: &Path,
    layout: Option<&Path>,
    link: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let profile = match from {
        Some(path) => PlayerProfile::from_json(&fs::read_to_string(path)?)?,
        None => player.into_profile()?,
    };
    let photo = photo.map(fs::read).transpose()?;

    let spec = profile.to_document_spec(title, photo)?;
    let bytes = engine(layout)?.render(&spec)?;
    let download = Download::new(bytes);

    let path = save(&download, output)?;
    println!("{} {}", "Saved to".green(), path.display());

    if link {
        println!("{}", download.html_link("Download PDF"));
    }

    Ok(())
}

fn cmd_render(
    title: &str,
    fields: &[String],
    image: Option<&Path>,
    output: &Path,
    layout: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let entries = fields
        .iter()
        .map(String::as_str)
        .map(parse_field)
        .collect::<Result<Vec<_>, _>>()?;

    let mut spec = DocumentSpec::new(title).with_fields(entries);
    if let Some(path) = image {
        spec = spec.with_image(fs::read(path)?);
    }

    let rendered = engine(layout)?.render_with_report(&spec)?;
    if rendered.report.overflow {
        println!(
            "{} rows run past the page border",
            "Warning:".yellow().bold()
        );
    }

    let path = save(&Download::new(rendered.bytes), output)?;
    println!("{} {}", "Saved to".green(), path.display());

    Ok(())
}

fn cmd_inspect(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let summary = inspect_file(input)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), summary.version);
    println!("{}: {}", "Pages".bold(), summary.page_count);
    println!(
        "{}: {:.2} x {:.2} pt",
        "Page size".bold(),
        summary.page_width,
        summary.page_height
    );
    println!("{}: {}", "Images".bold(), summary.images.len());

    println!();
    println!("{}", "Text".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for run in &summary.text_runs {
        if run.is_bold() {
            println!("{}", run.text.bold());
        } else {
            println!("  {}", run.text);
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "profilepdf".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Single-page player profile PDF generator");
    println!();
    println!(
        "Repository: {}",
        "https://github.com/iyulab/profilepdf".dimmed()
    );
    println!("License: MIT");
}

/// Split a `Label=Value` argument at the first `=`.
fn parse_field(arg: &str) -> Result<FieldEntry, Box<dyn std::error::Error>> {
    let (label, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("Invalid field {:?}: expected LABEL=VALUE", arg))?;
    Ok(FieldEntry::new(label.trim(), value.trim())?)
}

/// Write `download` to `output`, which may include a directory.
fn save(download: &Download, output: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let dir = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = output
        .file_name()
        .ok_or_else(|| format!("Invalid output path: {}", output.display()))?;

    let download = download
        .clone()
        .with_filename(file_name.to_string_lossy())?;
    Ok(download.save(dir)?)
}
